use criterion::{Criterion, black_box, criterion_group, criterion_main};
use geo::{LineString, point};
use walkshed_core::prelude::*;

const SIZE: u64 = 60;

fn grid(size: u64) -> StreetGraph {
    let id = |row: u64, col: u64| row * size + col + 1;
    let nodes = (0..size).flat_map(|row| {
        (0..size).map(move |col| {
            StreetNode::new(
                id(row, col),
                point!(x: col as f64 * 0.0005, y: row as f64 * 0.0005),
            )
        })
    });
    let mut edges = Vec::new();
    for row in 0..size {
        for col in 0..size {
            let mut link = |v: NodeId| {
                edges.push(StreetEdge {
                    u: id(row, col),
                    v,
                    key: 0,
                    length: 55.0,
                    geometry: LineString::new(vec![]),
                });
            };
            if col + 1 < size {
                link(id(row, col + 1));
            }
            if row + 1 < size {
                link(id(row + 1, col));
            }
        }
    }
    StreetGraph::from_parts(nodes, edges).unwrap()
}

fn bench_coverage(c: &mut Criterion) {
    let base = grid(SIZE);
    let shelters: Vec<Shelter> = (0..20)
        .map(|i| {
            let offset = f64::from(i) * 0.0014;
            Shelter::new(format!("shelter {i}"), offset + 0.0002, offset + 0.00025)
        })
        .collect();

    let mut graph = base.clone();
    let sources = add_shelters(&mut graph, &shelters, None).unwrap();

    c.bench_function("propagate 500m from 20 shelters", |b| {
        b.iter(|| propagate(black_box(&mut graph), black_box(&sources), 500.0).unwrap());
    });

    c.bench_function("classify grid", |b| b.iter(|| classify(black_box(&graph))));

    c.bench_function("insert shelters", |b| {
        b.iter(|| {
            let mut graph = base.clone();
            add_shelters(&mut graph, black_box(&shelters), None).unwrap()
        });
    });
}

criterion_group!(benches, bench_coverage);
criterion_main!(benches);
