//! Whole-program checking benchmarks.
//!
//! Run with: cargo bench -p tyck_program

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tyck_options::CheckerOptions;
use tyck_program::Program;

const SHAPES: &str = r#"
export interface Shape {
    area(): number;
    name: string;
}

export class Square implements Shape {
    name = "square";
    constructor(private side: number) {}
    area(): number {
        return this.side * this.side;
    }
}

export function largest(shapes: Shape[]): Shape | undefined {
    let best: Shape | undefined;
    for (const shape of shapes) {
        if (best === undefined || shape.area() > best.area()) {
            best = shape;
        }
    }
    return best;
}
"#;

const CONSUMER: &str = r#"
import { Square, largest, Shape } from "./shapes";

type Result<T> = { ok: true; value: T } | { ok: false; error: string };

function wrap<T>(value: T | undefined): Result<T> {
    if (value === undefined) {
        return { ok: false, error: "empty" };
    }
    return { ok: true, value };
}

const shapes: Shape[] = [new Square(1), new Square(3)];
const result = wrap(largest(shapes));
if (result.ok) {
    const n: string = result.value.name;
}
"#;

fn program(copies: usize) -> Program {
    let mut program = Program::new(CheckerOptions::strict());
    program.add_source("shapes.ts", SHAPES);
    for index in 0..copies {
        program.add_source(format!("consumer{index}.ts"), CONSUMER);
    }
    program
}

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_program");
    for copies in [1usize, 8, 32] {
        let program = program(copies);
        group.bench_with_input(BenchmarkId::from_parameter(copies), &program, |b, program| {
            b.iter(|| black_box(program.check()).ok())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_check);
criterion_main!(benches);
