//! Body hierarchy and transform composition
//!
//! Bodies form a shallow tree. A body's world transform is
//! `parent_frame ∘ orbit ∘ translate ∘ spin ∘ scale`, recomputed from the
//! absolute elapsed time on every call. Nothing is accumulated between
//! frames, so any time can be evaluated in any order.

use std::fmt;

use glam::Mat4;
use slotmap::{new_key_type, SlotMap};

use crate::OrbitalBody;

new_key_type! {
    /// Generational key to a body in the hierarchy
    pub struct BodyKey;
}

#[derive(Clone, Debug)]
struct BodyNode {
    body: OrbitalBody,
    parent: Option<BodyKey>,
}

/// World transform of one body at a given time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyTransform {
    pub key: BodyKey,
    /// Model matrix, scale included
    pub world: Mat4,
}

/// Tree of orbital bodies
///
/// A child can only be added under a parent that already exists, so the
/// structure is always a forest without cycles.
#[derive(Clone, Debug)]
pub struct BodyHierarchy {
    nodes: SlotMap<BodyKey, BodyNode>,
    /// Insertion order (also the draw order)
    order: Vec<BodyKey>,
}

impl Default for BodyHierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyHierarchy {
    /// Create an empty hierarchy
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Add a body with no parent
    pub fn add_root(&mut self, body: OrbitalBody) -> BodyKey {
        let key = self.nodes.insert(BodyNode { body, parent: None });
        self.order.push(key);
        key
    }

    /// Add a body orbiting `parent`
    pub fn add_child(&mut self, parent: BodyKey, body: OrbitalBody) -> Result<BodyKey, HierarchyError> {
        if !self.nodes.contains_key(parent) {
            return Err(HierarchyError::UnknownParent(body.name));
        }
        let key = self.nodes.insert(BodyNode {
            body,
            parent: Some(parent),
        });
        self.order.push(key);
        Ok(key)
    }

    /// Get a body by key
    pub fn get(&self, key: BodyKey) -> Option<&OrbitalBody> {
        self.nodes.get(key).map(|n| &n.body)
    }

    /// Parent of a body (None for roots and unknown keys)
    pub fn parent(&self, key: BodyKey) -> Option<BodyKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    /// Number of ancestors above a body
    pub fn depth(&self, key: BodyKey) -> usize {
        let mut depth = 0;
        let mut current = self.parent(key);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Find the first body with the given name
    pub fn find(&self, name: &str) -> Option<BodyKey> {
        self.order
            .iter()
            .copied()
            .find(|&key| self.nodes[key].body.name == name)
    }

    /// Number of bodies
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if there are no bodies
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate bodies in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (BodyKey, &OrbitalBody)> {
        self.order.iter().map(move |&key| (key, &self.nodes[key].body))
    }

    /// Frame a body's children are placed in, at time `t`
    pub fn frame_at(&self, key: BodyKey, t: f32) -> Option<Mat4> {
        let node = self.nodes.get(key)?;
        let local = node.body.local_frame(t);
        match node.parent {
            Some(parent) => Some(self.frame_at(parent, t)? * local),
            None => Some(local),
        }
    }

    /// World (model) transform of a body at time `t`
    pub fn world_transform(&self, key: BodyKey, t: f32) -> Option<Mat4> {
        let frame = self.frame_at(key, t)?;
        Some(frame * self.nodes[key].body.scale_matrix())
    }

    /// World transforms of every body at time `t`, in insertion order
    pub fn world_transforms(&self, t: f32) -> Vec<BodyTransform> {
        self.order
            .iter()
            .filter_map(|&key| {
                self.world_transform(key, t)
                    .map(|world| BodyTransform { key, world })
            })
            .collect()
    }
}

/// Hierarchy construction errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// The parent key does not exist (payload: the child's name)
    UnknownParent(String),
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyError::UnknownParent(name) => {
                write!(f, "Cannot add body '{}': parent does not exist", name)
            }
        }
    }
}

impl std::error::Error for HierarchyError {}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EPSILON: f32 = 1e-4;

    fn solar_system() -> (BodyHierarchy, BodyKey, BodyKey, BodyKey) {
        let mut hierarchy = BodyHierarchy::new();
        let sun = hierarchy.add_root(OrbitalBody::new("sun").with_scale(1.5));
        let earth = hierarchy
            .add_child(
                sun,
                OrbitalBody::new("earth")
                    .with_orbit_rate(30.0)
                    .with_spin_rate(100.0)
                    .with_offset(Vec3::new(2.3, 0.0, 0.0)),
            )
            .unwrap();
        let moon = hierarchy
            .add_child(
                earth,
                OrbitalBody::new("moon")
                    .with_offset(Vec3::new(1.0, 0.0, 0.0))
                    .with_scale(0.6),
            )
            .unwrap();
        (hierarchy, sun, earth, moon)
    }

    #[test]
    fn test_rest_pose_at_time_zero() {
        let (h, sun, earth, moon) = solar_system();

        let sun_world = h.world_transform(sun, 0.0).unwrap();
        assert!(sun_world.abs_diff_eq(Mat4::from_scale(Vec3::splat(1.5)), EPSILON));

        let earth_world = h.world_transform(earth, 0.0).unwrap();
        assert!(earth_world.abs_diff_eq(Mat4::from_translation(Vec3::new(2.3, 0.0, 0.0)), EPSILON));

        let moon_world = h.world_transform(moon, 0.0).unwrap();
        let expected = Mat4::from_translation(Vec3::new(3.3, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(0.6));
        assert!(moon_world.abs_diff_eq(expected, EPSILON), "got {:?}", moon_world);
    }

    #[test]
    fn test_parent_scale_does_not_propagate() {
        let (h, _sun, earth, _moon) = solar_system();
        // Earth sits 2.3 from the sun regardless of the sun's 1.5 scale
        let origin = h.world_transform(earth, 0.0).unwrap().transform_point3(Vec3::ZERO);
        assert!((origin.length() - 2.3).abs() < EPSILON);
    }

    #[test]
    fn test_moon_follows_earth_composition() {
        let (h, _sun, earth, moon) = solar_system();
        let t = 2.75;
        let earth_body = h.get(earth).unwrap();
        let expected = Mat4::from_rotation_y(earth_body.orbit_angle(t))
            * Mat4::from_translation(Vec3::new(2.3, 0.0, 0.0))
            * Mat4::from_rotation_y(earth_body.spin_angle(t))
            * Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))
            * Mat4::from_scale(Vec3::splat(0.6));
        let moon_world = h.world_transform(moon, t).unwrap();
        assert!(moon_world.abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn test_evaluation_has_no_hidden_state() {
        let (h, _sun, _earth, moon) = solar_system();
        let fresh = h.world_transform(moon, 7.5).unwrap();

        // Evaluate many unrelated times, including going backwards
        for i in 0..500 {
            let _ = h.world_transforms(i as f32 * 0.016);
        }
        let _ = h.world_transforms(100.0);
        let _ = h.world_transforms(0.0);

        assert_eq!(h.world_transform(moon, 7.5).unwrap(), fresh);
    }

    #[test]
    fn test_orbit_radius_constant_over_time() {
        let (h, _sun, earth, _moon) = solar_system();
        for i in 0..24 {
            let t = i as f32 * 0.5;
            let origin = h.world_transform(earth, t).unwrap().transform_point3(Vec3::ZERO);
            assert!((origin.length() - 2.3).abs() < EPSILON, "t={} r={}", t, origin.length());
            assert!(origin.y.abs() < EPSILON);
        }
    }

    #[test]
    fn test_world_transforms_in_insertion_order() {
        let (h, sun, earth, moon) = solar_system();
        let keys: Vec<BodyKey> = h.world_transforms(1.0).iter().map(|t| t.key).collect();
        assert_eq!(keys, vec![sun, earth, moon]);
    }

    #[test]
    fn test_depth_and_parent() {
        let (h, sun, earth, moon) = solar_system();
        assert_eq!(h.depth(sun), 0);
        assert_eq!(h.depth(earth), 1);
        assert_eq!(h.depth(moon), 2);
        assert_eq!(h.parent(moon), Some(earth));
        assert_eq!(h.parent(sun), None);
        assert_eq!(h.find("moon"), Some(moon));
        assert_eq!(h.find("pluto"), None);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let (mut other, _, _, _) = solar_system();
        let mut h = BodyHierarchy::new();
        let stale = other.add_root(OrbitalBody::new("elsewhere"));
        let err = h.add_child(stale, OrbitalBody::new("orphan")).unwrap_err();
        assert_eq!(err, HierarchyError::UnknownParent("orphan".to_string()));
        assert!(h.is_empty());
        assert!(format!("{}", err).contains("orphan"));
    }
}
