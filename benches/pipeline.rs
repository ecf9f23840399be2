use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

use isoplot::config::LandscapeConfig;
use isoplot::landscape::{self, LandscapeTable};
use isoplot::nl43::{EXAMPLE_CSV, GENOME_END};
use isoplot::pipeline::run_bytes;

/// Example input with its transcript block repeated `copies` times.
fn large_isoform_input(copies: usize) -> String {
    let (head, transcripts) = EXAMPLE_CSV
        .split_once("fragments,label,group,comment\n")
        .unwrap();
    let mut input = format!("{head}fragments,label,group,comment\n");
    for _ in 0..copies {
        input.push_str(transcripts);
    }
    input
}

fn large_landscape_input(samples: usize) -> String {
    let mut input =
        String::from("samp_name,ref_start,ref_end,defect,is_defective,is_inverted,highlighted\n");
    for i in 0..samples {
        writeln!(input, "s{i},638,4000,LargeDeletion,1,0,{}", i % 2).unwrap();
        writeln!(input, "s{i},6000,9632,LargeDeletion,1,0,0").unwrap();
    }
    input
}

fn bench_example(c: &mut Criterion) {
    c.bench_function("compile example (12 transcripts)", |b| {
        b.iter(|| {
            let output = run_bytes(EXAMPLE_CSV.as_bytes(), GENOME_END).unwrap();
            assert_eq!(output.compiled.transcripts.len(), 12);
        });
    });
}

fn bench_large_isoforms(c: &mut Criterion) {
    let input = large_isoform_input(500);

    c.bench_function("compile 6000 transcripts", |b| {
        b.iter(|| {
            let output = run_bytes(input.as_bytes(), GENOME_END).unwrap();
            assert_eq!(output.compiled.transcripts.len(), 6000);
        });
    });
}

fn bench_landscape(c: &mut Criterion) {
    let input = large_landscape_input(1000);
    let config = LandscapeConfig::default();

    c.bench_function("assemble landscape (1000 samples)", |b| {
        b.iter(|| {
            let table = LandscapeTable::read(&input).unwrap();
            let (_, plot) = landscape::assemble(&table, &config).unwrap();
            assert_eq!(plot.tracks.len(), 1000);
        });
    });
}

criterion_group!(benches, bench_example, bench_large_isoforms, bench_landscape);
criterion_main!(benches);
