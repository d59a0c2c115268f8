//! Benchmarks for the work done on every XMIR document.
//!
//! These benchmarks measure collecting foreign names and running the
//! optimization passes on generated programs of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eo_build::document::Xmir;
use eo_build::passes::PASSES;

/// A program with `objects` abstract objects, each holding a nested
/// abstract object and `calls` references to other objects.
fn generate_program(objects: usize, calls: usize) -> String {
    let mut xml = String::from("<program name=\"bench\"><objects>");
    let mut line = 1;
    for i in 0..objects {
        xml.push_str(&format!(
            "<o abstract=\"\" name=\"obj{}\" line=\"{}\" pos=\"0\">",
            i, line
        ));
        line += 1;
        xml.push_str(&format!("<o name=\"x\" line=\"{}\" pos=\"2\"/>", line));
        line += 1;
        for j in 0..calls {
            let base = match j % 3 {
                0 => format!("org.eolang.pkg{}.obj{}", i, j),
                1 => "x".to_string(),
                _ => format!("name{}", j),
            };
            xml.push_str(&format!(
                "<o base=\"{}\" line=\"{}\" pos=\"4\"/>",
                base, line
            ));
            line += 1;
        }
        xml.push_str(&format!(
            "<o abstract=\"\" name=\"inner\" line=\"{}\" pos=\"2\"><o base=\"x\" line=\"{}\" pos=\"4\"/></o>",
            line,
            line + 1
        ));
        line += 2;
        xml.push_str("</o>");
    }
    xml.push_str("</objects></program>");
    xml
}

fn bench_foreign_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("foreign_names");
    for objects in [10, 50, 200] {
        let xml = generate_program(objects, 10);
        let doc = Xmir::parse(&xml, "bench").expect("generated program parses");
        group.bench_with_input(BenchmarkId::new("objects", objects), &doc, |b, doc| {
            b.iter(|| black_box(doc).foreign_names())
        });
    }
    group.finish();
}

fn bench_passes(c: &mut Criterion) {
    let mut group = c.benchmark_group("passes");
    for objects in [10, 50, 200] {
        let xml = generate_program(objects, 10);
        group.bench_with_input(BenchmarkId::new("objects", objects), &xml, |b, xml| {
            b.iter(|| {
                let mut doc = Xmir::parse(black_box(xml), "bench").expect("parses");
                for pass in PASSES.iter() {
                    (pass.apply)(&mut doc).expect("pass applies");
                }
                doc
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_foreign_names, bench_passes);
criterion_main!(benches);
