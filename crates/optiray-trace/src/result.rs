//! Trace result store: pooled ray ownership and per-element record queues.
//!
//! A [`TraceResult`] owns every ray produced during one trace. Rays live in
//! a keyed arena and are addressed by stable [`RayKey`] handles, so queues
//! stay lightweight and the arena can grow without invalidating anything
//! already recorded. Storage is reclaimed in bulk by [`TraceResult::clear`],
//! never per ray.

use std::fmt;

use optiray_math::{Aabb3, Point3, Vec3};
use slotmap::SlotMap;

use crate::error::{Result, TraceError};

slotmap::new_key_type! {
    /// Stable handle to a pooled [`TraceRay`].
    pub struct RayKey;
}

/// Identity of an optical element or surface.
///
/// Identities are small positive integers assigned at system-assembly time;
/// the store's record table is pre-sized to the identity space, and records
/// are indexed at `id − 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Wrap a 1-based element identity.
    ///
    /// # Panics
    ///
    /// Panics on zero; identities start at 1.
    pub fn new(id: usize) -> Self {
        assert!(id >= 1, "element identities start at 1");
        Self(id)
    }

    /// The raw 1-based identity.
    pub fn get(self) -> usize {
        self.0
    }

    fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A pooled ray record.
///
/// Created exclusively through [`TraceResult::new_ray`] /
/// [`TraceResult::new_child_ray`] and owned by the store for the lifetime of
/// the current trace.
#[derive(Debug, Clone)]
pub struct TraceRay {
    /// Origin point.
    pub origin: Point3,
    /// Direction of propagation.
    pub direction: Vec3,
    /// Wavelength of the light carried by this ray.
    pub wavelength: f64,
    /// Light intensity carried by this ray.
    pub intensity: f64,
    /// The ray that generated this one, if any.
    pub parent: Option<RayKey>,
    /// Endpoint on the struck surface, set by the tracer once solved.
    pub intercept: Option<Point3>,
}

impl TraceRay {
    /// A ray record with no parent and no intercept yet.
    pub fn new(origin: Point3, direction: Vec3, wavelength: f64, intensity: f64) -> Self {
        Self {
            origin,
            direction,
            wavelength,
            intensity,
            parent: None,
            intercept: None,
        }
    }
}

/// Per-element recording state: two independently enableable queues.
///
/// A queue is `Some` exactly when its save flag was set at trace start;
/// flags change only between traces so queue identity is stable for the
/// trace's duration.
#[derive(Debug, Default)]
struct ElementRecord {
    intercepted: Option<Vec<RayKey>>,
    generated: Option<Vec<RayKey>>,
    save_intercepted: bool,
    save_generated: bool,
}

/// 2D histogram of intercept points over a surface window.
///
/// Bin counts are raw; any normalization is the caller's concern.
#[derive(Debug, Clone)]
pub struct SpotGrid {
    nx: usize,
    ny: usize,
    window: Aabb3,
    counts: Vec<u32>,
}

impl SpotGrid {
    /// Horizontal bin count.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Vertical bin count.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// The window the grid spans.
    pub fn window(&self) -> &Aabb3 {
        &self.window
    }

    /// Count in bin `(ix, iy)`.
    ///
    /// # Panics
    ///
    /// Panics when the bin indices are out of range.
    pub fn count(&self, ix: usize, iy: usize) -> u32 {
        assert!(ix < self.nx && iy < self.ny, "bin index out of range");
        self.counts[iy * self.nx + ix]
    }

    /// Total number of binned points.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// The largest single-bin count.
    pub fn peak(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Store for light propagation results.
///
/// Owns all rays created during one trace, remembers which element
/// intercepted and generated each ray (when recording is enabled for that
/// element), and derives window/centroid statistics over intercept points.
///
/// All mutation takes `&mut self`; one store serves one trace at a time and
/// the borrow rules enforce the required serialization.
#[derive(Debug)]
pub struct TraceResult {
    rays: SlotMap<RayKey, TraceRay>,
    elements: Vec<ElementRecord>,
    wavelengths: Vec<f64>,
    generating: Option<ElementId>,
    bounce_limit_count: u32,
}

impl TraceResult {
    /// A store pre-sized for `element_count` identities (1 through
    /// `element_count`).
    pub fn new(element_count: usize) -> Self {
        let mut elements = Vec::with_capacity(element_count);
        elements.resize_with(element_count, ElementRecord::default);
        Self {
            rays: SlotMap::with_key(),
            elements,
            wavelengths: Vec::new(),
            generating: None,
            bounce_limit_count: 0,
        }
    }

    /// Number of element identities the store is sized for.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of rays currently pooled.
    pub fn ray_count(&self) -> usize {
        self.rays.len()
    }

    fn record(&self, id: ElementId) -> &ElementRecord {
        // Out-of-range identity is a caller bug; the identity space is
        // pre-sized from the system.
        &self.elements[id.index()]
    }

    fn record_mut(&mut self, id: ElementId) -> &mut ElementRecord {
        &mut self.elements[id.index()]
    }

    // =========================================================================
    // Ray allocation
    // =========================================================================

    /// Allocate a ray from the pool.
    ///
    /// When a generation target is active (see [`Self::set_generating`]) and
    /// that element's generated queue is enabled, the new key is appended
    /// there as well. The returned handle stays valid until [`Self::clear`].
    pub fn new_ray(&mut self, ray: TraceRay) -> RayKey {
        let key = self.rays.insert(ray);
        if let Some(id) = self.generating {
            self.add_generated(id, key);
        }
        key
    }

    /// Allocate a ray generated by `parent`, recording the back-reference.
    pub fn new_child_ray(&mut self, mut ray: TraceRay, parent: RayKey) -> RayKey {
        ray.parent = Some(parent);
        self.new_ray(ray)
    }

    /// Select the element whose generated queue receives subsequently
    /// allocated rays, or `None` to stop routing them.
    pub fn set_generating(&mut self, element: Option<ElementId>) {
        self.generating = element;
    }

    /// Shared access to a pooled ray.
    pub fn ray(&self, key: RayKey) -> &TraceRay {
        &self.rays[key]
    }

    /// Exclusive access to a pooled ray (the tracer sets intercepts through
    /// this).
    pub fn ray_mut(&mut self, key: RayKey) -> &mut TraceRay {
        &mut self.rays[key]
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Record that `ray` was intercepted at surface `id`.
    ///
    /// A deliberate no-op when the surface's intercepted queue is disabled,
    /// so tracers report every interception unconditionally and memory is
    /// only spent where an analysis asked for it.
    pub fn add_intercepted(&mut self, id: ElementId, ray: RayKey) {
        if let Some(queue) = &mut self.record_mut(id).intercepted {
            queue.push(ray);
        }
    }

    /// Record that `ray` was generated by element `id`. No-op when disabled.
    pub fn add_generated(&mut self, id: ElementId, ray: RayKey) {
        if let Some(queue) = &mut self.record_mut(id).generated {
            queue.push(ray);
        }
    }

    /// Record a wavelength used for tracing (deduplicated).
    pub fn add_ray_wavelen(&mut self, wavelen: f64) {
        if let Err(pos) = self
            .wavelengths
            .binary_search_by(|w| w.total_cmp(&wavelen))
        {
            self.wavelengths.insert(pos, wavelen);
        }
    }

    /// The distinct wavelengths recorded so far, ascending.
    pub fn get_ray_wavelen_set(&self) -> &[f64] {
        &self.wavelengths
    }

    /// Count one ray path abandoned at the tracer's bounce limit.
    ///
    /// The stop policy itself belongs to the tracer; the store only keeps
    /// the tally.
    pub fn incr_bounce_limit_count(&mut self) {
        self.bounce_limit_count += 1;
    }

    /// Number of ray paths abandoned at the bounce limit.
    pub fn bounce_limit_count(&self) -> u32 {
        self.bounce_limit_count
    }

    // =========================================================================
    // Save states
    // =========================================================================

    /// Enable or disable recording of rays intercepted at surface `id`.
    ///
    /// Must only be toggled between traces; enabling materializes an empty
    /// queue, disabling drops it.
    pub fn set_intercepted_save_state(&mut self, id: ElementId, enabled: bool) {
        let rec = self.record_mut(id);
        rec.save_intercepted = enabled;
        rec.intercepted = enabled.then(Vec::new);
    }

    /// True when interceptions are being recorded for surface `id`.
    pub fn get_intercepted_save_state(&self, id: ElementId) -> bool {
        self.record(id).save_intercepted
    }

    /// Enable or disable recording of rays generated by element `id`.
    pub fn set_generated_save_state(&mut self, id: ElementId, enabled: bool) {
        let rec = self.record_mut(id);
        rec.save_generated = enabled;
        rec.generated = enabled.then(Vec::new);
    }

    /// True when generated rays are being recorded for element `id`.
    pub fn get_generated_save_state(&self, id: ElementId) -> bool {
        self.record(id).save_generated
    }

    /// Disable every save state, dropping all queues.
    pub fn clear_save_states(&mut self) {
        for rec in &mut self.elements {
            rec.save_intercepted = false;
            rec.save_generated = false;
            rec.intercepted = None;
            rec.generated = None;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The rays intercepted at surface `id`.
    ///
    /// Fails with [`TraceError::InterceptedNotSaved`] when recording was
    /// never enabled there — an empty slice only comes back from an enabled
    /// queue.
    pub fn get_intercepted(&self, id: ElementId) -> Result<&[RayKey]> {
        self.record(id)
            .intercepted
            .as_deref()
            .ok_or(TraceError::InterceptedNotSaved(id))
    }

    /// The rays generated by element `id`.
    pub fn get_generated(&self, id: ElementId) -> Result<&[RayKey]> {
        self.record(id)
            .generated
            .as_deref()
            .ok_or(TraceError::GeneratedNotSaved(id))
    }

    /// Axis-aligned window over all intercept endpoints on surface `id`.
    pub fn get_intercepted_window(&self, id: ElementId) -> Result<Aabb3> {
        let mut window = Aabb3::empty();
        let mut any = false;
        for p in self.intercept_points(id)? {
            window.include_point(&p);
            any = true;
        }
        if !any {
            return Err(TraceError::EmptyRecord(id));
        }
        Ok(window)
    }

    /// Midpoint of the intercept window on surface `id`.
    pub fn get_intercepted_center(&self, id: ElementId) -> Result<Point3> {
        Ok(self.get_intercepted_window(id)?.center())
    }

    /// Arithmetic mean of all intercept endpoints on surface `id`.
    ///
    /// Distinct from [`Self::get_intercepted_center`]: the mean of the
    /// points, not the midpoint of their bounding window.
    pub fn get_intercepted_centroid(&self, id: ElementId) -> Result<Point3> {
        let mut sum = Vec3::zeros();
        let mut n = 0usize;
        for p in self.intercept_points(id)? {
            sum += p.coords;
            n += 1;
        }
        if n == 0 {
            return Err(TraceError::EmptyRecord(id));
        }
        Ok(Point3::from(sum / n as f64))
    }

    /// Bin the intercept points on surface `id` into an `nx` by `ny`
    /// histogram spanning the intercept window (x across, y up).
    ///
    /// # Panics
    ///
    /// Panics on a zero bin count.
    pub fn pixelate(&self, id: ElementId, nx: usize, ny: usize) -> Result<SpotGrid> {
        assert!(nx > 0 && ny > 0, "histogram needs at least one bin per axis");
        let window = self.get_intercepted_window(id)?;
        let mut counts = vec![0u32; nx * ny];
        let span_x = window.max.x - window.min.x;
        let span_y = window.max.y - window.min.y;
        for p in self.intercept_points(id)? {
            let ix = bin_index(p.x, window.min.x, span_x, nx);
            let iy = bin_index(p.y, window.min.y, span_y, ny);
            counts[iy * nx + ix] += 1;
        }
        Ok(SpotGrid {
            nx,
            ny,
            window,
            counts,
        })
    }

    fn intercept_points(&self, id: ElementId) -> Result<impl Iterator<Item = Point3> + '_> {
        let queue = self.get_intercepted(id)?;
        Ok(queue.iter().filter_map(|&key| self.rays[key].intercept))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release every pooled ray and reset all queues for a new trace.
    ///
    /// Enabled queues come back empty, disabled ones stay absent; save-state
    /// configuration survives so repeated traces need no reconfiguration
    /// (pair with [`Self::clear_save_states`] to also reconfigure). The
    /// wavelength set and bounce tally reset too.
    pub fn clear(&mut self) {
        self.rays.clear();
        for rec in &mut self.elements {
            rec.intercepted = rec.save_intercepted.then(Vec::new);
            rec.generated = rec.save_generated.then(Vec::new);
        }
        self.wavelengths.clear();
        self.generating = None;
        self.bounce_limit_count = 0;
    }
}

/// Clamped bin index so points on the window's max edge land in the last
/// bin and a degenerate (single-point) span maps to bin 0.
fn bin_index(value: f64, min: f64, span: f64, bins: usize) -> usize {
    if span <= 0.0 {
        return 0;
    }
    let frac = (value - min) / span;
    ((frac * bins as f64) as usize).min(bins - 1)
}
