//! Animated mesh node state.
//!
//! Drives a floating-point frame cursor over an [`AnimatedMesh`] resource:
//! wrap-around when looping, clamping with a one-shot end notification when
//! not, and pinning for single-frame (static) meshes.

use std::fmt;
use std::sync::Arc;

use crate::resources::mesh::{AnimatedMesh, Mesh};
use crate::scene::NodeKey;

/// Callback invoked when a non-looping animation reaches its end bound.
pub type AnimationEndCallback = Box<dyn FnMut(NodeKey)>;

/// Sub-frame precision of the blend hint passed to the mesh resource.
const BLEND_PRECISION: f32 = 1000.0;

/// Kind-specific state of an animated mesh node.
pub struct AnimatedMeshState {
    pub(crate) mesh: Option<Arc<AnimatedMesh>>,

    start_frame: i32,
    end_frame: i32,
    /// Playback speed in frames per millisecond; negative plays backwards.
    speed: f32,
    current_frame: f32,
    looping: bool,

    // Transition blend progress, reserved for frame-to-frame blending.
    transiting: f32,
    transiting_blend: f32,

    last_time_ms: Option<u64>,

    /// Single subscriber notified once per end-bound crossing.
    end_callback: Option<AnimationEndCallback>,
    end_signal_armed: bool,

    /// Use the mesh parts' own materials instead of the node's copies.
    pub read_only_materials: bool,
}

impl AnimatedMeshState {
    #[must_use]
    pub fn new(mesh: Arc<AnimatedMesh>) -> Self {
        let end_frame = mesh.frame_count().saturating_sub(1) as i32;
        Self {
            mesh: Some(mesh),
            start_frame: 0,
            end_frame,
            speed: 0.025, // 25 frames per second
            current_frame: 0.0,
            looping: true,
            transiting: 0.0,
            transiting_blend: 0.0,
            last_time_ms: None,
            end_callback: None,
            end_signal_armed: true,
            read_only_materials: false,
        }
    }

    /// Currently displayed (fractional) frame number.
    #[inline]
    #[must_use]
    pub fn current_frame(&self) -> f32 {
        self.current_frame
    }

    #[inline]
    #[must_use]
    pub fn start_frame(&self) -> i32 {
        self.start_frame
    }

    #[inline]
    #[must_use]
    pub fn end_frame(&self) -> i32 {
        self.end_frame
    }

    #[inline]
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Sets playback speed in frames per second; the sign selects direction.
    pub fn set_speed_fps(&mut self, frames_per_second: f32) {
        self.speed = frames_per_second * 0.001;
    }

    /// Playback speed in frames per millisecond.
    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Constrains playback to `[start, end]`. Fails (returning false) when
    /// the range is inverted or outside the mesh's frames. The cursor jumps
    /// to `start` and the end notification re-arms.
    pub fn set_frame_loop(&mut self, start: i32, end: i32) -> bool {
        let max_frame = self
            .mesh
            .as_ref()
            .map_or(0, |m| m.frame_count().saturating_sub(1) as i32);
        if start > end || start < 0 || end > max_frame {
            return false;
        }

        self.start_frame = start;
        self.end_frame = end;
        self.current_frame = start as f32;
        self.end_signal_armed = true;
        true
    }

    /// Moves the cursor, clamped into the playback range. Moving it strictly
    /// inside the bounds re-arms the end notification.
    pub fn set_current_frame(&mut self, frame: f32) {
        self.current_frame = frame.clamp(self.start_frame as f32, self.end_frame as f32);
        if self.current_frame > self.start_frame as f32
            && self.current_frame < self.end_frame as f32
        {
            self.end_signal_armed = true;
        }
    }

    /// Registers the single end-of-animation subscriber.
    pub fn on_animation_end(&mut self, callback: AnimationEndCallback) {
        self.end_callback = Some(callback);
    }

    /// Starts a frame transition over `time_ms` milliseconds. The blend is
    /// tracked as a scalar progress value and resets once it completes.
    pub fn set_transition_time(&mut self, time_ms: f32) {
        self.transiting = if time_ms > 0.0 { 1.0 / time_ms } else { 0.0 };
        self.transiting_blend = 0.0;
    }

    /// Current transition-blend progress in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn transition_blend(&self) -> f32 {
        self.transiting_blend
    }

    /// Per-frame hook: computes the elapsed time and advances the cursor.
    /// Returns the bounding box of the resolved frame, if any.
    pub(crate) fn animate(
        &mut self,
        key: NodeKey,
        now_ms: u64,
    ) -> Option<crate::resources::BoundingBox> {
        let last = self.last_time_ms.unwrap_or(now_ms);
        self.last_time_ms = Some(now_ms);
        self.build_frame_cursor(key, now_ms.saturating_sub(last) as f32);

        self.mesh_for_current_frame().map(|m| m.bounding_box)
    }

    /// Advances the cursor by `elapsed_ms * speed` and applies the loop
    /// policy.
    ///
    /// When looping, the cursor wraps so that frame `end` lands on frame
    /// `start`; there is no interpolation across the seam, so the two frames
    /// must be authored as matching poses. When not looping, the cursor
    /// clamps at the bound in the playback direction and the end callback
    /// fires exactly once per crossing.
    pub fn build_frame_cursor(&mut self, key: NodeKey, elapsed_ms: f32) {
        if self.transiting != 0.0 {
            self.transiting_blend += elapsed_ms * self.transiting;
            if self.transiting_blend > 1.0 {
                self.transiting = 0.0;
                self.transiting_blend = 0.0;
            }
        }

        let start = self.start_frame as f32;
        let end = self.end_frame as f32;

        if self.start_frame == self.end_frame {
            // Static mesh: the cursor stays pinned.
            self.current_frame = start;
        } else if self.looping {
            self.current_frame += elapsed_ms * self.speed;

            if self.speed > 0.0 {
                if self.current_frame > end {
                    self.current_frame = start + (self.current_frame - start) % (end - start);
                }
            } else if self.current_frame < start {
                self.current_frame = end - (end - self.current_frame) % (end - start);
            }
        } else {
            self.current_frame += elapsed_ms * self.speed;

            if self.speed > 0.0 {
                if self.current_frame > end {
                    self.current_frame = end;
                    self.fire_animation_end(key);
                }
            } else if self.current_frame < start {
                self.current_frame = start;
                self.fire_animation_end(key);
            }
        }
    }

    fn fire_animation_end(&mut self, key: NodeKey) {
        if !self.end_signal_armed {
            return;
        }
        self.end_signal_armed = false;

        if let Some(callback) = self.end_callback.as_mut() {
            callback(key);
        }
    }

    /// Resolves the mesh for the current cursor position: integer frame from
    /// `floor(cursor)`, fractional part scaled to 1/1000ths as the blend
    /// hint for interpolating resources.
    #[must_use]
    pub fn mesh_for_current_frame(&self) -> Option<&Arc<Mesh>> {
        let mesh = self.mesh.as_ref()?;
        let frame = self.current_frame.floor() as i32;
        let blend = (self.current_frame.fract() * BLEND_PRECISION) as i32;
        mesh.mesh_for_frame(frame, blend, self.start_frame, self.end_frame)
    }
}

impl Clone for AnimatedMeshState {
    // End-callback subscribers do not transfer to clones.
    fn clone(&self) -> Self {
        Self {
            mesh: self.mesh.clone(),
            start_frame: self.start_frame,
            end_frame: self.end_frame,
            speed: self.speed,
            current_frame: self.current_frame,
            looping: self.looping,
            transiting: self.transiting,
            transiting_blend: self.transiting_blend,
            last_time_ms: self.last_time_ms,
            end_callback: None,
            end_signal_armed: self.end_signal_armed,
            read_only_materials: self.read_only_materials,
        }
    }
}

impl fmt::Debug for AnimatedMeshState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedMeshState")
            .field("mesh", &self.mesh.as_ref().map(|m| m.name.as_str()))
            .field("start_frame", &self.start_frame)
            .field("end_frame", &self.end_frame)
            .field("speed", &self.speed)
            .field("current_frame", &self.current_frame)
            .field("looping", &self.looping)
            .field("has_end_callback", &self.end_callback.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::mesh::Mesh;
    use slotmap::SlotMap;

    fn test_key() -> NodeKey {
        let mut map: SlotMap<NodeKey, ()> = SlotMap::with_key();
        map.insert(())
    }

    fn eleven_frame_state() -> AnimatedMeshState {
        let mut animated = AnimatedMesh::new("clip");
        for i in 0..=10 {
            animated.add_frame(Mesh::new(format!("frame{i}")));
        }
        AnimatedMeshState::new(Arc::new(animated))
    }

    #[test]
    fn looping_cursor_wraps_modulo() {
        let mut state = eleven_frame_state();
        assert!(state.set_frame_loop(0, 10));
        state.set_speed_fps(1000.0); // 1 frame per ms

        state.build_frame_cursor(test_key(), 15.0);
        assert!((state.current_frame() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn non_looping_cursor_clamps_and_fires_once() {
        let mut state = eleven_frame_state();
        assert!(state.set_frame_loop(0, 10));
        state.set_speed_fps(1000.0);
        state.set_looping(false);

        let fired = std::rc::Rc::new(std::cell::Cell::new(0u32));
        let fired_inner = fired.clone();
        state.on_animation_end(Box::new(move |_| {
            fired_inner.set(fired_inner.get() + 1);
        }));

        state.build_frame_cursor(test_key(), 15.0);
        assert!((state.current_frame() - 10.0).abs() < 1e-4);
        assert_eq!(fired.get(), 1);

        // Still clamped, no second notification.
        state.build_frame_cursor(test_key(), 5.0);
        assert!((state.current_frame() - 10.0).abs() < 1e-4);
        assert_eq!(fired.get(), 1);

        // Moving the cursor back inside re-arms the notification.
        state.set_current_frame(2.0);
        state.build_frame_cursor(test_key(), 50.0);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn single_frame_mesh_pins_cursor() {
        let mut animated = AnimatedMesh::new("static");
        animated.add_frame(Mesh::new("only"));
        let mut state = AnimatedMeshState::new(Arc::new(animated));
        state.set_speed_fps(1000.0);

        state.build_frame_cursor(test_key(), 123.0);
        assert!((state.current_frame() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn backwards_looping_wraps_mirrored() {
        let mut state = eleven_frame_state();
        assert!(state.set_frame_loop(0, 10));
        state.set_speed_fps(-1000.0);
        state.set_current_frame(0.0);

        // 15ms backwards from 0: -15 → 10 - ((10 - -15) mod 10) = 10 - 5 = 5
        state.build_frame_cursor(test_key(), 15.0);
        assert!((state.current_frame() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn transition_blend_progresses_and_resets() {
        let mut state = eleven_frame_state();
        state.set_transition_time(100.0);

        state.build_frame_cursor(test_key(), 50.0);
        assert!((state.transition_blend() - 0.5).abs() < 1e-4);

        // Crossing 1.0 ends the transition.
        state.build_frame_cursor(test_key(), 60.0);
        assert!(state.transition_blend().abs() < 1e-6);
    }

    #[test]
    fn invalid_frame_loop_is_rejected() {
        let mut state = eleven_frame_state();
        assert!(!state.set_frame_loop(5, 2));
        assert!(!state.set_frame_loop(-1, 5));
        assert!(!state.set_frame_loop(0, 99));
    }
}
