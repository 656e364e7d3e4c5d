use backup_diff::entry::{DifferenceEntry, ItemType};
use backup_diff::observer::Silent;
use backup_diff::reduce::reduce;
use backup_diff::rsync::parser::parse_output;
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// `dirs` missing directories, each holding `files_per_dir` missing files
/// under a nested subdirectory, plus unrelated entries
fn create_entries(dirs: usize, files_per_dir: usize) -> Vec<DifferenceEntry> {
    let mut entries = Vec::new();
    for d in 0..dirs {
        let root = format!("projects/p{d}");
        entries.push(DifferenceEntry::missing_from_backup(&root, ItemType::Directory));
        entries.push(DifferenceEntry::missing_from_backup(
            format!("{root}/src"),
            ItemType::Directory,
        ));
        for f in 0..files_per_dir {
            entries.push(DifferenceEntry::missing_from_backup(
                format!("{root}/src/file{f}.rs"),
                ItemType::File,
            ));
        }
        entries.push(DifferenceEntry::unknown(
            format!("shared/link{d}"),
            ItemType::File,
            "Rsync says this is a hard link",
        ));
    }
    entries
}

fn create_listing(lines: usize) -> Vec<String> {
    (0..lines)
        .map(|i| match i % 4 {
            0 => format!(">f+++++++++ new/file{i}.txt"),
            1 => format!("<f.st...... changed/file{i}.txt"),
            2 => format!("*deleting   stale/dir{i}/"),
            _ => format!(".d..t...... touched/dir{i}/"),
        })
        .collect()
}

fn benchmark_reduce(c: &mut Criterion) {
    let small = create_entries(10, 10);
    let medium = create_entries(100, 20);
    let large = create_entries(500, 20);

    let mut group = c.benchmark_group("reduce");

    for (name, entries) in [("small", &small), ("medium", &medium), ("large", &large)] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || entries.clone(),
                |entries| reduce(black_box(entries), &mut Silent),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let listing = create_listing(10_000);

    let mut group = c.benchmark_group("rsync_output");

    group.bench_function("parse_10k_lines", |b| {
        b.iter(|| parse_output(black_box(listing.iter().map(String::as_str))))
    });

    group.finish();
}

criterion_group!(benches, benchmark_reduce, benchmark_parse);
criterion_main!(benches);
