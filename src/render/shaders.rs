//! Embedded WGSL for the trace and present passes.
//!
//! Both passes draw the window-space screen quad through the orthographic
//! projection; fragments address the accumulation targets by pixel with
//! `textureLoad`, since `Rgba32Float` is not filterable on every adapter.

pub const TRACE_SHADER: &str = r#"
const SHAPE_CAPACITY: u32 = 512u;
const PI: f32 = 3.14159265;
const EPSILON: f32 = 0.01;
const FAR: f32 = 1e30;
const KIND_REFLECTIVE: u32 = 1u;
const KIND_EMISSIVE: u32 = 2u;

struct FrameParams {
    projection: mat4x4<f32>,
    resolution: vec2<f32>,
    time: f32,
    sample_index: u32,
    rays_per_sample: u32,
    max_bounces: u32,
    shape_count: u32,
    blend_weight: f32,
}

struct ShapeBlock {
    vertices: array<vec4<f32>, 512>,
    materials: array<vec4<f32>, 512>,
}

@group(0) @binding(0) var<uniform> frame: FrameParams;
@group(0) @binding(1) var<uniform> scene: ShapeBlock;
@group(0) @binding(2) var prev_target: texture_2d<f32>;

struct VsIn {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
}

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) world: vec2<f32>,
    @location(1) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VsIn) -> VsOut {
    var out: VsOut;
    out.clip = frame.projection * vec4<f32>(in.position, 0.0, 1.0);
    out.world = in.position;
    out.uv = in.uv;
    return out;
}

fn pcg(v: u32) -> u32 {
    let state = v * 747796405u + 2891336453u;
    let word = ((state >> ((state >> 28u) + 4u)) ^ state) * 277803737u;
    return (word >> 22u) ^ word;
}

fn rand(seed: ptr<function, u32>) -> f32 {
    *seed = pcg(*seed);
    return f32(*seed) / 4294967295.0;
}

fn cross2(a: vec2<f32>, b: vec2<f32>) -> f32 {
    return a.x * b.y - a.y * b.x;
}

struct Hit {
    t: f32,
    index: u32,
    normal: vec2<f32>,
}

// Nearest segment hit along origin + t * dir, t > EPSILON.
fn intersect(origin: vec2<f32>, dir: vec2<f32>) -> Hit {
    var hit: Hit;
    hit.t = FAR;
    hit.index = SHAPE_CAPACITY;
    hit.normal = vec2<f32>(0.0, 0.0);

    let count = min(frame.shape_count, SHAPE_CAPACITY);
    for (var i = 0u; i < count; i = i + 1u) {
        let seg = scene.vertices[i];
        let a = seg.xy;
        let e = seg.zw - seg.xy;
        let denom = cross2(dir, e);
        if (abs(denom) < 1e-8) {
            continue;
        }
        let ao = a - origin;
        let t = cross2(ao, e) / denom;
        let s = cross2(ao, dir) / denom;
        if (t > EPSILON && t < hit.t && s >= 0.0 && s <= 1.0) {
            hit.t = t;
            hit.index = i;
            hit.normal = normalize(vec2<f32>(-e.y, e.x));
        }
    }
    return hit;
}

fn rotate(v: vec2<f32>, angle: f32) -> vec2<f32> {
    let c = cos(angle);
    let s = sin(angle);
    return vec2<f32>(v.x * c - v.y * s, v.x * s + v.y * c);
}

fn trace_path(start: vec2<f32>, start_dir: vec2<f32>, seed: ptr<function, u32>) -> vec3<f32> {
    var origin = start;
    var dir = start_dir;
    var throughput = vec3<f32>(1.0, 1.0, 1.0);

    for (var bounce = 0u; bounce <= frame.max_bounces; bounce = bounce + 1u) {
        let hit = intersect(origin, dir);
        if (hit.index >= SHAPE_CAPACITY) {
            break;
        }
        let material = scene.materials[hit.index];
        let kind = u32(material.w + 0.5);
        if (kind == KIND_EMISSIVE) {
            return throughput * material.rgb;
        }

        var n = hit.normal;
        if (dot(n, dir) > 0.0) {
            n = -n;
        }
        throughput = throughput * material.rgb;
        origin = origin + dir * hit.t + n * EPSILON;

        if (kind == KIND_REFLECTIVE) {
            dir = reflect(dir, n);
        } else {
            // cosine-weighted about the facing normal
            let theta = asin(clamp(2.0 * rand(seed) - 1.0, -1.0, 1.0));
            dir = rotate(n, theta);
        }
    }
    return vec3<f32>(0.0, 0.0, 0.0);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let pixel = vec2<i32>(in.clip.xy);
    let px = vec2<u32>(in.clip.xy);
    var seed = pcg(px.x + pcg(px.y + pcg(frame.sample_index + pcg(bitcast<u32>(frame.time)))));

    let rays = max(frame.rays_per_sample, 1u);
    let jitter = rand(&seed);
    var sum = vec3<f32>(0.0, 0.0, 0.0);
    for (var i = 0u; i < rays; i = i + 1u) {
        let angle = (f32(i) + jitter) / f32(rays) * 2.0 * PI;
        sum = sum + trace_path(in.world, vec2<f32>(cos(angle), sin(angle)), &seed);
    }
    let estimate = sum / f32(rays);

    let prev = textureLoad(prev_target, pixel, 0).rgb;
    return vec4<f32>(mix(prev, estimate, frame.blend_weight), 1.0);
}
"#;

pub const PRESENT_SHADER: &str = r#"
struct PresentParams {
    projection: mat4x4<f32>,
    exposure: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
}

@group(0) @binding(0) var<uniform> params: PresentParams;
@group(0) @binding(1) var accum: texture_2d<f32>;

struct VsIn {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
}

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VsIn) -> VsOut {
    var out: VsOut;
    out.clip = params.projection * vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let radiance = textureLoad(accum, vec2<i32>(in.clip.xy), 0).rgb * params.exposure;
    // Reinhard
    let mapped = radiance / (vec3<f32>(1.0, 1.0, 1.0) + radiance);
    return vec4<f32>(mapped, 1.0);
}
"#;
