use cathar_shared::MapView;

/// Viewport manages the pan/zoom transformation from world coordinates to
/// screen coordinates, and the equirectangular projection tying world space
/// to WGS84 around the Languedoc.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

/// Reference latitude for the equirectangular projection.
const REF_LAT_DEG: f64 = 43.2;
const WORLD_UNITS_PER_DEG: f64 = 1000.0;

const MIN_SCALE: f64 = 0.05;
const MAX_SCALE: f64 = 32.0;
const ZOOM_SENSITIVITY: f64 = 0.001;

/// Web-map style zoom: `scale = 2^(zoom - ZOOM_BASE)`.
const ZOOM_BASE: f64 = 9.0;

/// Project WGS84 degrees into world coordinates (y grows downward).
pub fn project(lat: f64, lon: f64) -> (f64, f64) {
    let kx = WORLD_UNITS_PER_DEG * REF_LAT_DEG.to_radians().cos();
    (lon * kx, -lat * WORLD_UNITS_PER_DEG)
}

/// Inverse of [`project`].
pub fn unproject(wx: f64, wy: f64) -> (f64, f64) {
    let kx = WORLD_UNITS_PER_DEG * REF_LAT_DEG.to_radians().cos();
    (-wy / WORLD_UNITS_PER_DEG, wx / kx)
}

fn scale_for_zoom(zoom: f64) -> f64 {
    (zoom - ZOOM_BASE).exp2().clamp(MIN_SCALE, MAX_SCALE)
}

fn zoom_for_scale(scale: f64) -> f64 {
    scale.log2() + ZOOM_BASE
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Transform showing `view.center` at the canvas midpoint with the
    /// store's zoom level.
    pub fn from_view(view: &MapView, canvas_w: f64, canvas_h: f64) -> Self {
        let scale = scale_for_zoom(view.zoom);
        let (wx, wy) = project(view.center[0], view.center[1]);
        Self {
            offset_x: canvas_w / 2.0 - wx * scale,
            offset_y: canvas_h / 2.0 - wy * scale,
            scale,
        }
    }

    /// Convert world coordinates to screen coordinates.
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (
            wx * self.scale + self.offset_x,
            wy * self.scale + self.offset_y,
        )
    }

    /// Convert screen coordinates to world coordinates.
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    /// Zoom toward a focus point (screen coordinates).
    pub fn zoom_at(&mut self, delta: f64, screen_x: f64, screen_y: f64) {
        let factor = (-delta * ZOOM_SENSITIVITY).exp();
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;

        // Adjust offset so the point under the cursor stays fixed
        self.offset_x = screen_x - (screen_x - self.offset_x) * ratio;
        self.offset_y = screen_y - (screen_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// Pan by screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Fit the viewport to show the given world-coordinate bounds with padding.
    pub fn fit_bounds(
        &mut self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        canvas_w: f64,
        canvas_h: f64,
    ) {
        let world_w = max_x - min_x;
        let world_h = max_y - min_y;

        if world_w <= 0.0 || world_h <= 0.0 || canvas_w <= 0.0 || canvas_h <= 0.0 {
            return;
        }

        let padding = 0.05;
        let scale_x = canvas_w / (world_w * (1.0 + padding * 2.0));
        let scale_y = canvas_h / (world_h * (1.0 + padding * 2.0));
        self.scale = scale_x.min(scale_y).clamp(MIN_SCALE, MAX_SCALE);

        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;
        self.offset_x = canvas_w / 2.0 - center_x * self.scale;
        self.offset_y = canvas_h / 2.0 - center_y * self.scale;
    }

    /// Express the current transform as the store's geographic viewport:
    /// center `[lat, lon]`, zoom level, and extent
    /// `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn to_view(&self, canvas_w: f64, canvas_h: f64) -> MapView {
        let (cwx, cwy) = self.screen_to_world(canvas_w / 2.0, canvas_h / 2.0);
        let (clat, clon) = unproject(cwx, cwy);

        let (wx0, wy0) = self.screen_to_world(0.0, 0.0);
        let (wx1, wy1) = self.screen_to_world(canvas_w, canvas_h);
        let (lat_top, lon_left) = unproject(wx0, wy0);
        let (lat_bottom, lon_right) = unproject(wx1, wy1);

        MapView {
            center: [clat, clon],
            zoom: zoom_for_scale(self.scale),
            extent: vec![
                lon_left.min(lon_right),
                lat_top.min(lat_bottom),
                lon_left.max(lon_right),
                lat_top.max(lat_bottom),
            ],
        }
    }
}
