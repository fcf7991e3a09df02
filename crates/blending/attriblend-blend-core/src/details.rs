//! Monolithic blending settings: a default mode, an attribute filter and
//! per-attribute / per-property overrides, reconciled against concrete
//! source and target tables into a flat list of blending params.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use attriblend_api_core::{AttrKind, AttrValue, PointProperty, Selector};

use crate::modes::{BlendMode, LegacyBlendMode};
use crate::operation::{BlendOpConfig, OutputMode};
use crate::store::{Dataset, PointTable};

/// Names starting with this prefix belong to internal scratch buffers and
/// always blend as a plain copy.
const RESERVED_PREFIX: &str = "__";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendingFilter {
    #[default]
    All,
    Include,
    Exclude,
}

/// Explicit per-kind default values for newly created attributes. Kinds
/// without an override fall back to the kind's zero value.
#[derive(Clone, Debug, Default)]
pub struct TypeDefaults {
    overrides: HashMap<AttrKind, AttrValue>,
}

impl TypeDefaults {
    pub fn set(&mut self, v: AttrValue) {
        self.overrides.insert(v.kind(), v);
    }

    pub fn value_for(&self, kind: AttrKind) -> AttrValue {
        self.overrides
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| AttrValue::default_of(kind))
    }
}

/// Per-property blend modes. Unset properties are not blended at all.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertiesBlendingDetails {
    #[serde(default)]
    pub density: Option<LegacyBlendMode>,
    #[serde(default)]
    pub position: Option<LegacyBlendMode>,
    #[serde(default)]
    pub rotation: Option<LegacyBlendMode>,
    #[serde(default)]
    pub scale: Option<LegacyBlendMode>,
    #[serde(default)]
    pub bounds_min: Option<LegacyBlendMode>,
    #[serde(default)]
    pub bounds_max: Option<LegacyBlendMode>,
    #[serde(default)]
    pub color: Option<LegacyBlendMode>,
    #[serde(default)]
    pub steepness: Option<LegacyBlendMode>,
    #[serde(default)]
    pub seed: Option<LegacyBlendMode>,
}

impl PropertiesBlendingDetails {
    pub fn mode_for(&self, p: PointProperty) -> Option<LegacyBlendMode> {
        match p {
            PointProperty::Density => self.density,
            PointProperty::Position => self.position,
            PointProperty::Rotation => self.rotation,
            PointProperty::Scale => self.scale,
            PointProperty::BoundsMin => self.bounds_min,
            PointProperty::BoundsMax => self.bounds_max,
            PointProperty::Color => self.color,
            PointProperty::Steepness => self.steepness,
            PointProperty::Seed => self.seed,
        }
    }
}

/// One reconciled blending assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendingParam {
    pub identifier: (String, AttrKind),
    pub selector: Selector,
    pub blending: LegacyBlendMode,
    /// The attribute exists on the source but not (yet) on the target.
    pub is_new: bool,
}

impl BlendingParam {
    /// Lower into an operation config: same-named output on the target.
    /// Existing attributes blend source against the target's own value; new
    /// ones have no target operand and take the source side as-is.
    pub fn to_config(&self) -> BlendOpConfig {
        let mut config = BlendOpConfig::new(BlendMode::from(self.blending), self.selector.clone())
            .with_output(OutputMode::New, Some(self.selector.clone()));
        if !self.is_new {
            config = config.with_operand_b(self.selector.clone());
        }
        config
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlendingDetails {
    pub default_blending: LegacyBlendMode,
    #[serde(default)]
    pub filter: BlendingFilter,
    #[serde(default)]
    pub filtered_attributes: HashSet<String>,
    #[serde(default)]
    pub attribute_overrides: HashMap<String, LegacyBlendMode>,
    #[serde(default)]
    pub properties: PropertiesBlendingDetails,
}

impl BlendingDetails {
    pub fn new(default_blending: LegacyBlendMode) -> BlendingDetails {
        BlendingDetails {
            default_blending,
            ..BlendingDetails::default()
        }
    }

    pub fn can_blend(&self, name: &str) -> bool {
        match self.filter {
            BlendingFilter::All => true,
            BlendingFilter::Include => self.filtered_attributes.contains(name),
            BlendingFilter::Exclude => !self.filtered_attributes.contains(name),
        }
    }

    fn mode_for(&self, name: &str) -> LegacyBlendMode {
        if name.starts_with(RESERVED_PREFIX) {
            return LegacyBlendMode::Copy;
        }
        self.attribute_overrides
            .get(name)
            .copied()
            .unwrap_or(self.default_blending)
    }

    /// Reconcile the source's attributes against the target. Target-only
    /// attributes are ignored, kind mismatches are dropped with a single
    /// aggregate warning, and source-only attributes come back `is_new`.
    pub fn get_blending_params(
        &self,
        source: &PointTable,
        target: &PointTable,
    ) -> Vec<BlendingParam> {
        let mut params = Vec::new();
        let mut mismatched: Vec<String> = Vec::new();
        for (name, kind) in source.attribute_identities() {
            if !self.can_blend(&name) {
                continue;
            }
            let mode = self.mode_for(&name);
            if matches!(BlendMode::from(mode), BlendMode::None) {
                continue;
            }
            let is_new = match target.attribute_kind(&name) {
                Some(target_kind) if target_kind != kind => {
                    mismatched.push(name);
                    continue;
                }
                Some(_) => false,
                None => true,
            };
            params.push(BlendingParam {
                selector: Selector::attribute(name.clone()),
                identifier: (name, kind),
                blending: mode,
                is_new,
            });
        }
        if !mismatched.is_empty() {
            log::warn!(
                "{} attribute(s) skipped over kind mismatch: {}",
                mismatched.len(),
                mismatched.join(", ")
            );
        }
        params
    }

    /// Property assignments, for the properties that carry a mode.
    pub fn get_property_params(&self) -> Vec<BlendingParam> {
        PointProperty::ALL
            .iter()
            .filter_map(|&p| {
                let mode = self.properties.mode_for(p)?;
                if matches!(BlendMode::from(mode), BlendMode::None) {
                    return None;
                }
                Some(BlendingParam {
                    identifier: (p.name().to_string(), p.kind()),
                    selector: Selector::property(p),
                    blending: mode,
                    is_new: false,
                })
            })
            .collect()
    }

    /// Lower reconciled params into an operation config list, attribute
    /// params first, then properties.
    pub fn generate_configs(&self, source: &PointTable, target: &PointTable) -> Vec<BlendOpConfig> {
        let mut configs: Vec<BlendOpConfig> = self
            .get_blending_params(source, target)
            .iter()
            .map(BlendingParam::to_config)
            .collect();
        for p in self.get_property_params() {
            configs.push(
                BlendOpConfig::new(BlendMode::from(p.blending), p.selector.clone())
                    .with_operand_b(p.selector.clone())
                    .with_output(OutputMode::SameAsA, None),
            );
        }
        configs
    }

    /// Declare `is_new` attributes on the target and fill them with their
    /// per-kind default values.
    pub fn apply_defaults(
        &self,
        params: &[BlendingParam],
        defaults: &TypeDefaults,
        target: &Dataset,
    ) {
        for p in params.iter().filter(|p| p.is_new) {
            let (name, kind) = &p.identifier;
            let value = defaults.value_for(*kind);
            target.with_output_mut(|t| {
                t.ensure_attribute(name, *kind);
                t.fill_attribute(name, &value);
            });
        }
    }
}
