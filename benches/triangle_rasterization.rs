use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use scanraster::{
    barycentric::{Barycentric, Varying},
    math::utils::BLACK,
    pipeline::Pipeline,
    prim3d::{RasterizerConfig, RasterizerImplementation},
    shaders::Shader,
    texture::{ColorBuffer, DepthBuffer},
    vec::Vec3,
    Pixel,
};

const WIDTH: usize = 720;
const HEIGHT: usize = 720;

/// Screen space grid of `cells * cells` quads, two triangles each, with a depth ripple.
struct Grid {
    cells: usize,
    depths: Varying<f32>,
}

impl Grid {
    fn corner(&self, i: usize, j: usize) -> Vec3 {
        let step_x = WIDTH as f32 / self.cells as f32;
        let step_y = HEIGHT as f32 / self.cells as f32;
        let z = 100. + 50. * ((i + j) as f32 * 0.3).sin();
        Vec3::from([i as f32 * step_x, j as f32 * step_y, z])
    }

    fn triangle_count(&self) -> usize {
        self.cells * self.cells * 2
    }
}

impl Shader for Grid {
    fn vertex(&mut self, face: usize, nth: usize) -> Option<Vec3> {
        let cell = face / 2;
        let (i, j) = (cell % self.cells, cell / self.cells);
        let corners = if face % 2 == 0 {
            [(i, j), (i + 1, j), (i + 1, j + 1)]
        } else {
            [(i, j), (i + 1, j + 1), (i, j + 1)]
        };
        let (ci, cj) = corners[nth];
        let p = self.corner(ci, cj);
        self.depths.set(nth, p.z);
        Some(p)
    }

    fn fragment(&self, bar: Barycentric) -> Option<Pixel> {
        let z = self.depths.interpolate(bar)?;
        let c = z.clamp(0., 255.) as u8;
        Some([c, c, c, 0xff])
    }
}

fn triangle_rasterization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Triangle rasterization");

    let mut pixels = ColorBuffer::new(WIDTH, HEIGHT, BLACK);
    let mut depth = DepthBuffer::new_depth(WIDTH, HEIGHT);

    // few large triangles, then many small ones
    for cells in [4, 32, 256] {
        for implementation in RasterizerImplementation::enumerate() {
            let config = RasterizerConfig::default().with_implementation(implementation);
            let mut grid = Grid {
                cells,
                depths: Varying::new(),
            };
            let id = BenchmarkId::new(format!("{implementation:?}"), grid.triangle_count());
            group.bench_function(id, |b| {
                b.iter(|| {
                    pixels.fill(BLACK);
                    depth.clear_depth();
                    let mut pipeline = Pipeline::new(&mut pixels, config)
                        .with_depth_buffer(&mut depth)
                        .unwrap();
                    let count = grid.triangle_count();
                    pipeline.draw(count, &mut grid);
                    black_box(pipeline.finish());
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, triangle_rasterization);
criterion_main!(benches);
