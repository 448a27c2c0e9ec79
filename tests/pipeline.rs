use scanraster::{
    math::utils::{BLACK, TRANSPARENT, WHITE},
    obj::{parse_obj, Model},
    pipeline::Pipeline,
    prim3d::{CullingMode, RasterizerConfig, RasterizerImplementation},
    shaders::{SolidShader, TexturedShader, Uniforms},
    texture::{ColorBuffer, DepthBuffer, Filter, TextureWrap},
    transform::{Camera, Transform},
    vec::{Mat4x4, Vec3},
    Pixel,
};

const RED: Pixel = [0xff, 0, 0, 0xff];
const BLUE: Pixel = [0, 0, 0xff, 0xff];

fn uniforms(model: Mat4x4) -> Uniforms {
    let camera = Camera {
        perspective: false,
        ..Camera::default()
    };
    let transform = Transform::new(model, &camera, 16, 16, 255.);
    Uniforms::new(&transform, Vec3::from([0., 0., 1.])).unwrap()
}

#[test]
fn test_textured_quad() {
    let quad = Model::quad();
    // rows top to bottom as stored in an image file
    let texture = ColorBuffer::from_vec(2, 2, vec![RED, BLUE, WHITE, TRANSPARENT]).unwrap();

    for implementation in RasterizerImplementation::enumerate() {
        let mut pixels = ColorBuffer::new(16, 16, BLACK);
        let mut depth = DepthBuffer::new_depth(16, 16);
        let config = RasterizerConfig::default().with_implementation(implementation);
        let metrics = {
            let mut pipeline = Pipeline::new(&mut pixels, config)
                .with_depth_buffer(&mut depth)
                .unwrap();
            let mut shader = TexturedShader::new(&quad, uniforms(Mat4x4::identity()), &texture);
            pipeline.draw_mesh(&quad, &mut shader);
            pipeline.finish()
        };
        assert_eq!(metrics.triangles_drawn, 2);
        assert_eq!(metrics.depth_rejected, 0);

        // buffer row 0 is v = 0, the last texture row
        assert_eq!(pixels.pixel(2, 2), WHITE);
        assert_eq!(pixels.pixel(13, 2), TRANSPARENT);
        assert_eq!(pixels.pixel(2, 13), RED);
        assert_eq!(pixels.pixel(13, 13), BLUE);

        // the flipped image reads like the texture
        pixels.flip_vertically();
        assert_eq!(pixels.pixel(2, 2), RED);
        assert_eq!(pixels.pixel(13, 2), BLUE);
    }
}

#[test]
fn test_bilinear_checkerboard_quad() {
    let quad = Model::quad();
    let checkerboard = ColorBuffer::from_vec(2, 2, vec![BLACK, WHITE, WHITE, BLACK]).unwrap();

    for implementation in RasterizerImplementation::enumerate() {
        let mut pixels = ColorBuffer::new(16, 16, TRANSPARENT);
        let mut depth = DepthBuffer::new_depth(16, 16);
        let config = RasterizerConfig::default().with_implementation(implementation);
        {
            let mut pipeline = Pipeline::new(&mut pixels, config)
                .with_depth_buffer(&mut depth)
                .unwrap();
            let mut shader = TexturedShader::new(&quad, uniforms(Mat4x4::identity()), &checkerboard)
                .with_sampling(TextureWrap::Clamp, Filter::Bilinear);
            pipeline.draw_mesh(&quad, &mut shader);
        }

        // the quad spans pixels 0..=14, uv = pixel / 15
        assert_eq!(pixels.pixel(0, 0), WHITE, "{implementation:?}");
        assert_eq!(pixels.pixel(14, 0), BLACK, "{implementation:?}");
        assert_eq!(pixels.pixel(0, 14), BLACK, "{implementation:?}");
        assert_eq!(pixels.pixel(14, 14), WHITE, "{implementation:?}");

        // the center blends all four texels
        let [r, g, b, a] = pixels.pixel(8, 8);
        assert!(r > 0 && r < 0xff, "{implementation:?}: {r}");
        assert_eq!((g, b, a), (r, r, 0xff));
    }
}

#[test]
fn test_alpha_clip_keeps_depth() {
    let quad = Model::quad();
    let texture = ColorBuffer::from_vec(2, 2, vec![RED, BLUE, WHITE, TRANSPARENT]).unwrap();
    let mut pixels = ColorBuffer::new(16, 16, BLACK);
    let mut depth = DepthBuffer::new_depth(16, 16);
    let metrics = {
        let mut pipeline = Pipeline::new(&mut pixels, RasterizerConfig::default())
            .with_depth_buffer(&mut depth)
            .unwrap();
        let mut shader = TexturedShader::new(&quad, uniforms(Mat4x4::identity()), &texture)
            .with_alpha_clip(Some(0x80));
        pipeline.draw_mesh(&quad, &mut shader);
        pipeline.finish()
    };
    assert!(metrics.fragments_discarded > 0);
    assert_eq!(pixels.pixel(13, 2), BLACK);
    assert_eq!(depth.depth(13, 2), f32::NEG_INFINITY);
    assert!(depth.depth(2, 2).is_finite());
}

#[test]
fn test_culling_modes() {
    // the same triangle wound both ways
    let model = parse_obj(
        "v -0.5 -0.5 0\nv 0.5 -0.5 0\nv 0 0.5 0\nvn 0 0 1\nf 1//1 2//1 3//1\nf 1//1 3//1 2//1\n",
    )
    .unwrap();

    let render = |culling: CullingMode| {
        let mut pixels = ColorBuffer::new(16, 16, BLACK);
        let mut depth = DepthBuffer::new_depth(16, 16);
        let config = RasterizerConfig::default().with_culling(culling);
        let mut pipeline = Pipeline::new(&mut pixels, config)
            .with_depth_buffer(&mut depth)
            .unwrap();
        let mut shader = SolidShader::new(&model, uniforms(Mat4x4::identity()), WHITE);
        pipeline.draw_mesh(&model, &mut shader);
        pipeline.finish()
    };

    let both = render(CullingMode::Disabled);
    assert_eq!(both.triangles_drawn, 2);
    assert_eq!(both.depth_rejected, both.pixels_written);

    for culling in [CullingMode::BackFace, CullingMode::FrontFace] {
        let metrics = render(culling);
        assert_eq!(metrics.triangles_drawn, 1, "{culling}");
        assert_eq!(metrics.culled, 1, "{culling}");
        assert_eq!(metrics.pixels_written, both.pixels_written);
    }
}

#[test]
fn test_unit_cube_clipping_skips_triangles() {
    let quad = Model::quad();
    let scaled = Vec3::from([2., 2., 2.]).to_scale();

    let mut pixels = ColorBuffer::new(16, 16, BLACK);
    let mut pipeline = Pipeline::new(&mut pixels, RasterizerConfig::default());
    let mut shader = SolidShader::new(&quad, uniforms(scaled).with_clipping(true), WHITE);
    pipeline.draw_mesh(&quad, &mut shader);
    let metrics = pipeline.finish();
    assert_eq!(metrics.vertex_skipped, 2);
    assert_eq!(metrics.triangles_drawn, 0);
    assert!(pixels.as_slice().iter().all(|&p| p == BLACK));

    // without clipping the same quad covers the whole surface
    let mut pipeline = Pipeline::new(&mut pixels, RasterizerConfig::default());
    let mut shader = SolidShader::new(&quad, uniforms(scaled), WHITE);
    pipeline.draw_mesh(&quad, &mut shader);
    let metrics = pipeline.finish();
    assert_eq!(metrics.triangles_drawn, 2);
    assert_eq!(metrics.pixels_written, 16 * 16);
}
