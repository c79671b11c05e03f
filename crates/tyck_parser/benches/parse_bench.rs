use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tyck_core::intern::StringInterner;
use tyck_parser::parse_source;

// Declarations and control flow of the kind the checker spends its time on.
const SOURCE: &str = r#"
interface Shape {
    kind: "circle" | "square";
    size: number;
    label?: string;
}

interface Circle extends Shape {
    kind: "circle";
    radius: number;
}

type Pair<A, B> = [first: A, second: B];
type Keys<T> = { [K in keyof T]: T[K] extends Function ? never : K }[keyof T];
type ElementOf<T> = T extends (infer U)[] ? U : never;

enum Direction {
    Up = 1,
    Down,
    Left,
    Right,
}

namespace Geometry.Units {
    export const scale = 2;
}

class Registry<T extends Shape> {
    private readonly items: T[] = [];
    static count = 0;

    constructor(public name: string) {}

    add(item: T): this {
        this.items.push(item);
        Registry.count++;
        return this;
    }

    get size(): number {
        return this.items.length;
    }

    find(predicate: (item: T) => boolean): T | undefined {
        for (const item of this.items) {
            if (predicate(item)) {
                return item;
            }
        }
        return undefined;
    }
}

function area(shape: Circle | Shape): number {
    switch (shape.kind) {
        case "circle":
            return 3.14 * shape.size ** 2;
        default:
            return shape.size * shape.size;
    }
}

function describe(value: string | number | null): string {
    if (typeof value === "string") {
        return value.toUpperCase();
    } else if (value === null) {
        return "none";
    }
    return `number ${value.toFixed(2)}`;
}

const identity = <T,>(x: T): T => x;
const total = [1, 2, 3].reduce((sum, n) => sum + n, 0);
const config = { verbose: true, depth: 3, tags: ["a", "b"] } as const;

export { Registry, area, describe };
export default identity;
"#;

fn bench_parse_medium(c: &mut Criterion) {
    let interner = StringInterner::new();
    c.bench_function("parse_medium", |b| {
        b.iter(|| {
            let tree = parse_source("bench.ts", black_box(SOURCE), &interner);
            black_box(tree);
        });
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let interner = StringInterner::new();
    let large = SOURCE.repeat(20);
    c.bench_function("parse_large", |b| {
        b.iter(|| {
            let tree = parse_source("bench.ts", black_box(&large), &interner);
            black_box(tree);
        });
    });
}

criterion_group!(benches, bench_parse_medium, bench_parse_large);
criterion_main!(benches);
