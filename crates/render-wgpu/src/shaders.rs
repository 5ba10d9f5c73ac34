/// WGSL shader for scene meshes: lit or unlit, optional color and normal maps.
pub const MESH_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    ambient_color: vec4<f32>,
};

struct Object {
    model: mat4x4<f32>,
    color: vec4<f32>,
    // x: lit, y: has color map, z: has normal map
    flags: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0)
var<uniform> object: Object;
@group(1) @binding(1)
var color_map: texture_2d<f32>;
@group(1) @binding(2)
var normal_map: texture_2d<f32>;
@group(1) @binding(3)
var map_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = object.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.world_position = world.xyz;
    out.world_normal = (object.model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = vertex.uv;
    return out;
}

// Tangent frame from screen-space derivatives; no per-vertex tangents needed.
fn perturb_normal(
    n: vec3<f32>,
    q0: vec3<f32>,
    q1: vec3<f32>,
    st0: vec2<f32>,
    st1: vec2<f32>,
    mapped: vec3<f32>,
) -> vec3<f32> {
    let q1perp = cross(q1, n);
    let q0perp = cross(n, q0);
    let t = q1perp * st0.x + q0perp * st1.x;
    let b = q1perp * st0.y + q0perp * st1.y;
    let det = max(dot(t, t), dot(b, b));
    let scale = select(inverseSqrt(det), 0.0, det == 0.0);
    return normalize(t * (mapped.x * scale) + b * (mapped.y * scale) + n * mapped.z);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Image rows run top-down while uv.y runs bottom-up.
    let tex_uv = vec2<f32>(in.uv.x, 1.0 - in.uv.y);
    let base = textureSample(color_map, map_sampler, tex_uv);
    let mapped = textureSample(normal_map, map_sampler, tex_uv).xyz * 2.0 - 1.0;

    // dpdy runs down the framebuffer; flip it so the frame matches uv space.
    let q0 = dpdx(in.world_position);
    let q1 = -dpdy(in.world_position);
    let st0 = dpdx(in.uv);
    let st1 = -dpdy(in.uv);

    let albedo = object.color.rgb * base.rgb;
    if object.flags.x < 0.5 {
        return vec4<f32>(albedo, 1.0);
    }

    var n = normalize(in.world_normal);
    if object.flags.z > 0.5 {
        n = perturb_normal(n, q0, q1, st0, st1, mapped);
    }

    let to_light = normalize(frame.light_position.xyz - in.world_position);
    let diffuse = max(dot(n, to_light), 0.0) * frame.light_color.rgb * frame.light_position.w;
    let lighting = frame.ambient_color.rgb + diffuse;
    return vec4<f32>(albedo * lighting, 1.0);
}
"#;

/// WGSL shader for the full-screen background texture.
pub const BACKGROUND_SHADER: &str = r#"
@group(0) @binding(0)
var background: texture_2d<f32>;
@group(0) @binding(1)
var background_sampler: sampler;

struct BackgroundOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

// One oversized triangle covering the viewport.
@vertex
fn vs_background(@builtin(vertex_index) index: u32) -> BackgroundOutput {
    let x = f32((index & 1u) * 4u) - 1.0;
    let y = f32((index >> 1u) * 4u) - 1.0;

    var out: BackgroundOutput;
    out.clip_position = vec4<f32>(x, y, 1.0, 1.0);
    out.uv = vec2<f32>((x + 1.0) * 0.5, (1.0 - y) * 0.5);
    return out;
}

@fragment
fn fs_background(in: BackgroundOutput) -> @location(0) vec4<f32> {
    return textureSample(background, background_sampler, in.uv);
}
"#;
