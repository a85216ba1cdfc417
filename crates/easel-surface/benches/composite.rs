use criterion::{black_box, criterion_group, criterion_main, Criterion};
use easel_surface::{composite_tree, Brush, Canvas, Color, Surface};

fn build_tree(depth: usize, fanout: usize) -> (Surface, Vec<Surface>) {
    let root = Surface::new(800, 600).unwrap();
    root.set_brush(Brush::solid(Color::BLUE));
    root.ellipse(100, 100, 700, 500).unwrap();
    let mut keep = Vec::new();
    let mut level = vec![root.clone()];
    for d in 0..depth {
        let mut next = Vec::new();
        for parent in &level {
            for i in 0..fanout {
                let child = Surface::with_position(120, 90, (i * 130) as i32, (d * 40) as i32).unwrap();
                child.line(0, 0, 119, 89).unwrap();
                child.rect(10, 10, 110, 80).unwrap();
                parent.add_child(&child);
                next.push(child.clone());
                keep.push(child);
            }
        }
        level = next;
    }
    (root, keep)
}

fn composite_benchmark(c: &mut Criterion) {
    let mut dest = Canvas::new(800, 600).unwrap();
    let src = Surface::new(800, 600).unwrap();
    src.ellipse(0, 0, 800, 600).unwrap();
    let src_canvas = src.draw(|canvas| {
        let mut copy = Canvas::new(800, 600).unwrap();
        copy.composite(canvas, 0, 0);
        copy
    });

    c.bench_function("composite 800x600", |b| {
        b.iter(|| dest.composite(black_box(&src_canvas), 0, 0))
    });

    let (root, _children) = build_tree(3, 3);
    c.bench_function("composite tree 3x3", |b| {
        b.iter(|| {
            let mut frame = Canvas::new(800, 600).unwrap();
            frame.fill(Color::WHITE);
            composite_tree(black_box(&root), &mut frame, 0, 0);
            frame
        })
    });
}

criterion_group!(benches, composite_benchmark);
criterion_main!(benches);
