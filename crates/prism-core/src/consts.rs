/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default pixel count above which a decomposition runs on a worker thread.
pub const DEFAULT_LARGE_IMAGE_THRESHOLD: u64 = 8192 * 8192;

/// Number of planes produced by a channel split (R, G, B or L, a, b).
pub const SPLIT_PLANE_COUNT: usize = 3;

/// Scale step applied by an explicit zoom in.
pub const ZOOM_IN_STEP: f64 = 2.0;

/// Scale step applied by an explicit zoom out.
pub const ZOOM_OUT_STEP: f64 = 0.5;

/// Scale step applied per wheel notch towards the user.
pub const WHEEL_ZOOM_IN_STEP: f64 = 1.25;

/// Scale step applied per wheel notch away from the user.
pub const WHEEL_ZOOM_OUT_STEP: f64 = 0.75;

/// Smallest scale an explicit zoom step may reach.
pub const MIN_ZOOM_SCALE: f64 = 1e-4;

/// Largest scale an explicit zoom step may reach.
pub const MAX_ZOOM_SCALE: f64 = 1e4;

/// Wheel angle delta (eighths of a degree) that makes up one notch.
pub const DEFAULT_WHEEL_NOTCH_ANGLE: i32 = 120;

/// Fill value of the blank placeholder canvas.
pub const PLACEHOLDER_GRAY: u8 = 192;

/// sRGB gamma: linear segment threshold on the encoded value.
pub const SRGB_DECODE_THRESHOLD: f64 = 0.040_448_236_277_107_6;

/// D65 reference white, X component.
pub const WHITEPOINT_X: f64 = 0.950_456;

/// D65 reference white, Y component.
pub const WHITEPOINT_Y: f64 = 1.0;

/// D65 reference white, Z component.
pub const WHITEPOINT_Z: f64 = 1.088_754;

/// Linear RGB (sRGB primaries) to CIE XYZ, D65.
pub const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412_395_588_967_414_2, 0.357_583_430_763_714_8, 0.180_492_647_381_701_6],
    [0.212_586_230_785_595_6, 0.715_170_303_703_410_8, 0.072_200_498_643_336_23],
    [0.019_297_215_491_746_94, 0.119_183_864_580_848_5, 0.950_497_125_131_579_8],
];

/// Lower bound of the cube-root branch of the L*a*b* f() function, (6/29)^3.
pub const LAB_EPSILON: f64 = 8.856_451_679_035_631e-3;
