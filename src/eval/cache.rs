use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;

use crate::animation::property::{AnimatableProperty, PropertyValue};

/// Per-render-pass memoization of property evaluations.
///
/// Keyed by `(property id, frame)` so several consumers of the same property
/// within one pass share a single evaluation. A cache never outlives the
/// pass that created it: recreate it (or call [`EvalCache::invalidate`])
/// when the current frame changes or any track mutates. Evaluation is pure,
/// so cancelling a pass is just dropping its cache.
#[derive(Clone, Debug, Default)]
pub struct EvalCache {
    values: HashMap<String, HashMap<u64, PropertyValue>>,
}

impl EvalCache {
    /// Create an empty cache for one render pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for a property at a frame, if present.
    pub fn get(&self, property_id: &str, frame: f64) -> Option<PropertyValue> {
        self.values.get(property_id)?.get(&frame_key(frame)).copied()
    }

    /// Store a value for a property at a frame.
    pub fn insert(&mut self, property_id: &str, frame: f64, value: PropertyValue) {
        self.values
            .entry(property_id.to_owned())
            .or_default()
            .insert(frame_key(frame), value);
    }

    /// Cached value, or the result of `sample` (which is then cached).
    pub fn get_or_insert_with(
        &mut self,
        property_id: &str,
        frame: f64,
        sample: impl FnOnce(f64) -> PropertyValue,
    ) -> PropertyValue {
        if let Some(v) = self.get(property_id, frame) {
            return v;
        }
        let v = sample(frame);
        self.insert(property_id, frame, v);
        v
    }

    /// Drop every cached value. Call after any track edit.
    pub fn invalidate(&mut self) {
        self.values.clear();
    }

    /// Number of cached entries across all properties.
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn frame_key(frame: f64) -> u64 {
    frame.to_bits()
}

/// Heterogeneous collection of a layer's animatable properties, keyed by id.
///
/// Holds the tagged [`PropertyValue`] form so camera FOV, path parameter,
/// audio level, and color properties can live side by side. Mutation goes
/// through [`PropertySet::get_mut`]; evaluation reads immutable snapshots
/// and can fan out across worker threads.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PropertySet {
    properties: BTreeMap<String, AnimatableProperty<PropertyValue>>,
}

impl PropertySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a property, keyed by its id.
    pub fn insert(&mut self, property: AnimatableProperty<PropertyValue>) {
        self.properties.insert(property.id.clone(), property);
    }

    /// Look up a property by id.
    pub fn get(&self, id: &str) -> Option<&AnimatableProperty<PropertyValue>> {
        self.properties.get(id)
    }

    /// Mutable lookup; the single mutation entry point for contained
    /// properties.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut AnimatableProperty<PropertyValue>> {
        self.properties.get_mut(id)
    }

    /// Remove a property by id.
    pub fn remove(&mut self, id: &str) -> Option<AnimatableProperty<PropertyValue>> {
        self.properties.remove(id)
    }

    /// Iterate properties in id order.
    pub fn iter(&self) -> impl Iterator<Item = &AnimatableProperty<PropertyValue>> {
        self.properties.values()
    }

    /// Number of properties in the set.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Evaluate every property at `frame` into `cache`, fanning out across
    /// worker threads.
    ///
    /// Each worker reads an immutable property snapshot; results are merged
    /// on the calling thread.
    #[tracing::instrument(skip(self, cache), fields(properties = self.properties.len()))]
    pub fn evaluate_into(&self, frame: f64, cache: &mut EvalCache) {
        let sampled: Vec<(&str, PropertyValue)> = self
            .properties
            .par_iter()
            .map(|(id, p)| (id.as_str(), p.current_value(frame)))
            .collect();
        for (id, value) in sampled {
            cache.insert(id, frame, value);
        }
    }

    /// Evaluate every property at `frame` into a fresh per-pass cache.
    pub fn evaluate_pass(&self, frame: f64) -> EvalCache {
        let mut cache = EvalCache::new();
        self.evaluate_into(frame, &mut cache);
        cache
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/cache.rs"]
mod tests;
