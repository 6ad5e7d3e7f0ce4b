use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hazard_nav::{
    GridCoord, GridFrame, ObjectId, Planner, ScriptedWorld, SemanticCell, SemanticGrid,
    WalkConfig, WalkTarget, WalkTo,
};

/// Open floor with staggered walls every eighth column, each with one gap.
fn maze(size: usize) -> SemanticGrid {
    let mut grid = SemanticGrid::filled(size, size, SemanticCell::FLOOR).expect("grid");
    for col in (8..size).step_by(8) {
        let gap = if (col / 8) % 2 == 0 { 1 } else { size - 2 };
        for row in 0..size {
            if row != gap {
                grid.set(GridCoord::new(row as i32, col as i32), SemanticCell::wall(1.0))
                    .expect("in bounds");
            }
        }
    }
    grid
}

fn corridor_layout(len: usize) -> String {
    let wall = "#".repeat(len + 2);
    format!("{wall}\n#A{}1#\n{wall}\n", ".".repeat(len - 2))
}

fn bench_planner(c: &mut Criterion) {
    let planner = Planner::default();
    let mut group = c.benchmark_group("hazard-nav/planner");

    for size in [64usize, 256] {
        let grid = maze(size);
        let origin = GridCoord::new(0, 0);
        let destination = GridCoord::new(size as i32 - 1, size as i32 - 1);
        group.bench_function(format!("plan_maze_{size}"), |b| {
            b.iter(|| {
                let path = planner
                    .plan(black_box(&grid), origin, destination)
                    .expect("plan")
                    .expect("path");
                black_box(path.len());
            })
        });
    }

    let layout = corridor_layout(64);
    group.bench_function("walk_corridor_64", |b| {
        b.iter(|| {
            let mut world =
                ScriptedWorld::from_layout(&layout, GridFrame::new(0.5, 0.0, 0.0)).expect("world");
            let report = WalkTo::new(
                WalkTarget::Object(ObjectId(1)),
                WalkConfig::default(),
                Planner::default(),
            )
            .run(&mut world);
            black_box(report.steps.len());
        })
    });

    group.finish();
}

criterion_group!(benches, bench_planner);
criterion_main!(benches);
