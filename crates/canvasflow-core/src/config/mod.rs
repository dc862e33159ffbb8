use serde_json::{Map, Value};

/// Loose, JSON-shaped configuration shared by every canvasflow crate.
///
/// Keys are addressed with dotted paths (`"viewport.maxScale"`). Typed option structs read
/// the keys they care about and fall back to their defaults for anything missing or mistyped.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig(Value);

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl CanvasConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64().filter(|v| v.is_finite())
    }

    pub fn get_u64(&self, dotted_path: &str) -> Option<u64> {
        self.get(dotted_path)?.as_u64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Configs are objects; coerce anything else so user input can never make this panic.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

/// Scale bounds applied to every zoom request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 3.0,
        }
    }
}

impl ZoomLimits {
    pub fn from_config(config: &CanvasConfig) -> Self {
        let d = Self::default();
        let min_scale = config
            .get_f64("viewport.minScale")
            .filter(|v| *v > 0.0)
            .unwrap_or(d.min_scale);
        let max_scale = config
            .get_f64("viewport.maxScale")
            .filter(|v| *v >= min_scale)
            .unwrap_or(d.max_scale.max(min_scale));
        Self {
            min_scale,
            max_scale,
        }
    }

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Parameters of the fit-to-content view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Model-space padding added on every side of the content box.
    pub padding: f64,
    /// Screen height reserved for UI chrome; subtracted before computing the vertical scale.
    pub chrome_height: f64,
    /// Extra downward shift applied after centering.
    pub top_offset: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: 80.0,
            chrome_height: 100.0,
            top_offset: 32.0,
        }
    }
}

impl FitOptions {
    pub fn from_config(config: &CanvasConfig) -> Self {
        let d = Self::default();
        Self {
            padding: config
                .get_f64("viewport.fitPadding")
                .filter(|v| *v >= 0.0)
                .unwrap_or(d.padding),
            chrome_height: config
                .get_f64("viewport.chromeHeight")
                .filter(|v| *v >= 0.0)
                .unwrap_or(d.chrome_height),
            top_offset: config
                .get_f64("viewport.topOffset")
                .unwrap_or(d.top_offset),
        }
    }
}

/// Edge curve construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryOptions {
    /// Distance of each control point from its endpoint, along the side normal.
    pub curvature: f64,
    /// Segment count used when a renderer needs a polyline instead of a true curve.
    pub curve_steps: usize,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            curvature: 60.0,
            curve_steps: 10,
        }
    }
}

impl GeometryOptions {
    pub fn from_config(config: &CanvasConfig) -> Self {
        let d = Self::default();
        Self {
            curvature: config
                .get_f64("geometry.curvature")
                .unwrap_or(d.curvature),
            curve_steps: config
                .get_u64("geometry.curveSteps")
                .filter(|v| *v > 0)
                .map(|v| v as usize)
                .unwrap_or(d.curve_steps),
        }
    }
}
