/// 8-wide frustum culling.
///
/// Bounds are transposed into structure-of-arrays lanes (all eight `min.x`
/// together, and so on) so one plane can be tested against eight boxes with
/// a single vector operation per term. The result is a bitmask: bit `i` is
/// set when box `i` is visible.
///
/// The lane arithmetic follows `Plane::box_distance` operation for
/// operation, without fused multiply-add, so the mask is bit-identical to
/// eight scalar `Frustum::is_visible` calls.

use glam::Vec3;
use crate::math::Bound;
use super::frustum::Frustum;

/// Number of bounds tested per batch.
pub const BATCH_WIDTH: usize = 8;

/// Eight bounds in structure-of-arrays layout, 32-byte aligned.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C, align(32))]
pub struct BoundBatch8 {
    pub min_x: [f32; BATCH_WIDTH],
    pub min_y: [f32; BATCH_WIDTH],
    pub min_z: [f32; BATCH_WIDTH],
    pub max_x: [f32; BATCH_WIDTH],
    pub max_y: [f32; BATCH_WIDTH],
    pub max_z: [f32; BATCH_WIDTH],
}

impl BoundBatch8 {
    /// Transpose eight bounds into lanes.
    pub fn from_bounds(bounds: &[Bound; BATCH_WIDTH]) -> Self {
        let mut batch = Self::default();
        for (lane, bound) in bounds.iter().enumerate() {
            batch.set(lane, bound);
        }
        batch
    }

    /// Write one lane.
    pub fn set(&mut self, lane: usize, bound: &Bound) {
        self.min_x[lane] = bound.min.x;
        self.min_y[lane] = bound.min.y;
        self.min_z[lane] = bound.min.z;
        self.max_x[lane] = bound.max.x;
        self.max_y[lane] = bound.max.y;
        self.max_z[lane] = bound.max.z;
    }

    /// Read one lane back as a bound.
    pub fn get(&self, lane: usize) -> Bound {
        Bound::new(
            Vec3::new(self.min_x[lane], self.min_y[lane], self.min_z[lane]),
            Vec3::new(self.max_x[lane], self.max_y[lane], self.max_z[lane]),
        )
    }
}

impl Frustum {
    /// Test eight bounds at once. Bit `i` of the result is set iff
    /// `self.is_visible(&bounds[i])`.
    pub fn are_visible_8(&self, bounds: &[Bound; BATCH_WIDTH]) -> u8 {
        self.are_visible_batch(&BoundBatch8::from_bounds(bounds))
    }

    /// Test an already transposed batch.
    ///
    /// Uses AVX when the CPU supports it, the portable lane loop otherwise.
    pub fn are_visible_batch(&self, batch: &BoundBatch8) -> u8 {
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("avx") {
                // SAFETY: AVX support was just detected at runtime
                return unsafe { avx::are_visible(self, batch) };
            }
        }
        self.are_visible_batch_portable(batch)
    }

    /// Lane-loop implementation of `are_visible_batch`.
    pub fn are_visible_batch_portable(&self, batch: &BoundBatch8) -> u8 {
        let mut center = [Vec3::ZERO; BATCH_WIDTH];
        let mut half_extent = [Vec3::ZERO; BATCH_WIDTH];
        for lane in 0..BATCH_WIDTH {
            center[lane] = Vec3::new(
                (batch.min_x[lane] + batch.max_x[lane]) * 0.5,
                (batch.min_y[lane] + batch.max_y[lane]) * 0.5,
                (batch.min_z[lane] + batch.max_z[lane]) * 0.5,
            );
            half_extent[lane] = Vec3::new(
                (batch.max_x[lane] - batch.min_x[lane]) * 0.5,
                (batch.max_y[lane] - batch.min_y[lane]) * 0.5,
                (batch.max_z[lane] - batch.min_z[lane]) * 0.5,
            );
        }

        let mut mask = 0xFFu8;
        for plane in &self.planes {
            let mut plane_mask = 0u8;
            for lane in 0..BATCH_WIDTH {
                if plane.box_distance(center[lane], half_extent[lane]) >= 0.0 {
                    plane_mask |= 1 << lane;
                }
            }
            mask &= plane_mask;
            // No later plane can bring a culled box back
            if mask == 0 {
                break;
            }
        }
        mask
    }

    /// Cull any number of bounds, appending the indices of visible ones
    /// to `visible` in ascending order.
    ///
    /// Full groups of eight go through the batch test; the remainder is
    /// tested one by one.
    pub fn cull(&self, bounds: &[Bound], visible: &mut Vec<usize>) {
        let mut chunks = bounds.chunks_exact(BATCH_WIDTH);
        let mut base = 0;
        for chunk in &mut chunks {
            let mut batch = BoundBatch8::default();
            for (lane, bound) in chunk.iter().enumerate() {
                batch.set(lane, bound);
            }
            let mask = self.are_visible_batch(&batch);
            for lane in 0..BATCH_WIDTH {
                if mask & (1 << lane) != 0 {
                    visible.push(base + lane);
                }
            }
            base += BATCH_WIDTH;
        }

        for (offset, bound) in chunks.remainder().iter().enumerate() {
            if self.is_visible(bound) {
                visible.push(base + offset);
            }
        }
    }
}

#[cfg(target_arch = "x86_64")]
mod avx {
    use std::arch::x86_64::*;
    use super::{BoundBatch8, Frustum};

    /// AVX version of `Frustum::are_visible_batch_portable`.
    ///
    /// # Safety
    ///
    /// The CPU must support AVX.
    #[target_feature(enable = "avx")]
    pub(super) unsafe fn are_visible(frustum: &Frustum, batch: &BoundBatch8) -> u8 {
        let half = _mm256_set1_ps(0.5);
        let zero = _mm256_setzero_ps();
        let sign_bit = _mm256_set1_ps(-0.0);

        // BoundBatch8 is 32-byte aligned and every lane array is 32 bytes wide
        let min_x = _mm256_load_ps(batch.min_x.as_ptr());
        let min_y = _mm256_load_ps(batch.min_y.as_ptr());
        let min_z = _mm256_load_ps(batch.min_z.as_ptr());
        let max_x = _mm256_load_ps(batch.max_x.as_ptr());
        let max_y = _mm256_load_ps(batch.max_y.as_ptr());
        let max_z = _mm256_load_ps(batch.max_z.as_ptr());

        let center_x = _mm256_mul_ps(_mm256_add_ps(min_x, max_x), half);
        let center_y = _mm256_mul_ps(_mm256_add_ps(min_y, max_y), half);
        let center_z = _mm256_mul_ps(_mm256_add_ps(min_z, max_z), half);
        let extent_x = _mm256_mul_ps(_mm256_sub_ps(max_x, min_x), half);
        let extent_y = _mm256_mul_ps(_mm256_sub_ps(max_y, min_y), half);
        let extent_z = _mm256_mul_ps(_mm256_sub_ps(max_z, min_z), half);

        let mut mask: i32 = 0xFF;
        for plane in &frustum.planes {
            let nx = _mm256_set1_ps(plane.normal.x);
            let ny = _mm256_set1_ps(plane.normal.y);
            let nz = _mm256_set1_ps(plane.normal.z);
            let d = _mm256_set1_ps(plane.distance);

            let dot = _mm256_add_ps(
                _mm256_add_ps(_mm256_mul_ps(nx, center_x), _mm256_mul_ps(ny, center_y)),
                _mm256_mul_ps(nz, center_z),
            );
            let distance = _mm256_sub_ps(dot, d);

            // |n| by clearing the sign bit
            let ax = _mm256_andnot_ps(sign_bit, nx);
            let ay = _mm256_andnot_ps(sign_bit, ny);
            let az = _mm256_andnot_ps(sign_bit, nz);
            let radius = _mm256_add_ps(
                _mm256_add_ps(_mm256_mul_ps(ax, extent_x), _mm256_mul_ps(ay, extent_y)),
                _mm256_mul_ps(az, extent_z),
            );

            let inside = _mm256_cmp_ps::<_CMP_GE_OQ>(_mm256_add_ps(distance, radius), zero);
            mask &= _mm256_movemask_ps(inside);
            if mask == 0 {
                break;
            }
        }
        mask as u8
    }
}

#[cfg(test)]
#[path = "frustum_batch_tests.rs"]
mod tests;
