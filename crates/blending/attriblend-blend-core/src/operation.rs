//! A configured blend step: operands, weighting, output placement and type
//! authority, prepared into a bound `ProxyBlender`.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use attriblend_api_core::selector::Target;
use attriblend_api_core::{AttrKind, Selector};

use crate::blender::{OpStats, ProxyBlender};
use crate::curve::{FloatLut, WeightCurve};
use crate::error::PrepareError;
use crate::modes::BlendMode;
use crate::proxy::{ProxyDescriptor, ProxyRole, StreamProxy};
use crate::store::{Dataset, IoSide};

/// Where the per-point weight comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WeightInput {
    Constant(f64),
    Attribute(Selector),
}

impl Default for WeightInput {
    fn default() -> Self {
        WeightInput::Constant(0.5)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightSettings {
    #[serde(default)]
    pub input: WeightInput,
    #[serde(default)]
    pub curve: WeightCurve,
}

/// Where the result is written.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    #[default]
    SameAsA,
    SameAsB,
    /// Named attribute, kept on the output
    New,
    /// Named attribute used as scratch, dropped at cleanup unless the input
    /// already carried it
    Transient,
}

/// How the output's real kind is decided.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputTypeAuthority {
    OperandA,
    OperandB,
    Custom(AttrKind),
    #[default]
    Auto,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlendOpConfig {
    pub blend_mode: BlendMode,
    pub operand_a: Selector,
    #[serde(default)]
    pub operand_b: Option<Selector>,
    #[serde(default)]
    pub weighting: WeightSettings,
    #[serde(default)]
    pub output_mode: OutputMode,
    /// Required for `New` and `Transient` output modes.
    #[serde(default)]
    pub output_to: Option<Selector>,
    #[serde(default = "default_true")]
    pub reset_value_before_multi: bool,
    #[serde(default)]
    pub output_type: OutputTypeAuthority,
    /// Set by sibling resolution: the operand now names a buffer written by
    /// an earlier operation, so it must be read from the target's output side.
    #[serde(skip)]
    pub operand_a_from_sibling: bool,
    #[serde(skip)]
    pub operand_b_from_sibling: bool,
}

impl BlendOpConfig {
    pub fn new(mode: BlendMode, operand_a: Selector) -> BlendOpConfig {
        BlendOpConfig {
            blend_mode: mode,
            operand_a,
            operand_b: None,
            weighting: WeightSettings::default(),
            output_mode: OutputMode::SameAsA,
            output_to: None,
            reset_value_before_multi: true,
            output_type: OutputTypeAuthority::Auto,
            operand_a_from_sibling: false,
            operand_b_from_sibling: false,
        }
    }

    pub fn with_operand_b(mut self, b: Selector) -> Self {
        self.operand_b = Some(b);
        self
    }

    pub fn with_output(mut self, mode: OutputMode, to: Option<Selector>) -> Self {
        self.output_mode = mode;
        self.output_to = to;
        self
    }

    pub fn with_weight(mut self, input: WeightInput) -> Self {
        self.weighting.input = input;
        self
    }

    /// The selector this operation writes to, as seen by later siblings.
    pub fn resolved_output_selector(&self) -> Result<Selector, PrepareError> {
        match self.output_mode {
            OutputMode::SameAsA => Ok(self.operand_a.clone()),
            OutputMode::SameAsB => Ok(self
                .operand_b
                .clone()
                .unwrap_or_else(|| self.operand_a.clone())),
            OutputMode::New | OutputMode::Transient => self.output_to.clone().ok_or_else(|| {
                PrepareError::InvalidSelector(
                    "output mode requires an explicit output attribute".to_string(),
                )
            }),
        }
    }
}

enum WeightReader {
    Constant(f64),
    Stream(StreamProxy),
}

/// A prepared operation. Construction only succeeds once every stream is
/// bound; failures leave no partial state behind.
pub struct BlendOperation {
    pub op_idx: usize,
    pub mode: BlendMode,
    pub output_mode: OutputMode,
    pub is_new_attribute: bool,
    /// Concrete selector the result lands on, the operation's identity when
    /// ops from several sources are folded into shared tracker slots.
    pub output_selector: Selector,
    blender: ProxyBlender,
    lut: FloatLut,
    weight: WeightReader,
}

impl BlendOperation {
    pub fn prepare(
        config: &BlendOpConfig,
        op_idx: usize,
        source_a: &Dataset,
        source_b: Option<&Dataset>,
        target: &Dataset,
    ) -> Result<BlendOperation, PrepareError> {
        if config.operand_a.is_sibling_reference()
            || config
                .operand_b
                .as_ref()
                .is_some_and(|s| s.is_sibling_reference())
        {
            return Err(PrepareError::OnlyAttributesAndPropertiesSupported);
        }

        let lut = config.weighting.curve.bake(FloatLut::DEFAULT_RESOLUTION);
        let weight = match &config.weighting.input {
            WeightInput::Constant(w) => WeightReader::Constant(*w),
            WeightInput::Attribute(sel) => {
                let d = ProxyDescriptor::capture(target, sel, IoSide::In, ProxyRole::Read)?;
                WeightReader::Stream(StreamProxy::from_descriptor(&d))
            }
        };

        // sibling-resolved operands read the buffer an earlier operation
        // wrote, which lives on the target's output side
        let b_dataset = source_b.unwrap_or(target);
        let mut a_desc = if config.operand_a_from_sibling {
            ProxyDescriptor::capture(target, &config.operand_a, IoSide::Out, ProxyRole::Read)?
        } else {
            ProxyDescriptor::capture(source_a, &config.operand_a, IoSide::In, ProxyRole::Read)?
        };
        let mut b_desc = match &config.operand_b {
            Some(sel) if config.operand_b_from_sibling => Some(ProxyDescriptor::capture(
                target,
                sel,
                IoSide::Out,
                ProxyRole::Read,
            )?),
            Some(sel) => Some(ProxyDescriptor::capture(
                b_dataset,
                sel,
                IoSide::In,
                ProxyRole::Read,
            )?),
            None => None,
        };

        let output_selector = config.resolved_output_selector()?;

        // real kind of the output stream
        let existing = match &output_selector.target {
            Target::Attribute(name) => target.attr_kind(IoSide::Out, name),
            Target::Property(p) => Some(p.kind()),
            Target::Sibling(_) => {
                return Err(PrepareError::OnlyAttributesAndPropertiesSupported)
            }
        };
        // a sub-field output must land inside an attribute that already
        // exists; there is no carrier to inject the component into otherwise
        if output_selector.sub.is_some() && existing.is_none() {
            return Err(PrepareError::OnlyAttributesAndPropertiesSupported);
        }
        let output_kind = match config.output_type {
            OutputTypeAuthority::OperandA => a_desc.real_kind,
            OutputTypeAuthority::OperandB => {
                b_desc.as_ref().map(|d| d.real_kind).unwrap_or(a_desc.real_kind)
            }
            OutputTypeAuthority::Custom(kind) => kind,
            OutputTypeAuthority::Auto => match existing {
                Some(kind) => kind,
                None => {
                    // selector-aware: a sub-field operand rates as Double
                    let ka = a_desc.working_kind;
                    let kb = b_desc.as_ref().map(|d| d.working_kind).unwrap_or(ka);
                    // strictly broader wins, ties keep operand A
                    if kb.rating() > ka.rating() {
                        kb
                    } else {
                        ka
                    }
                }
            },
        };

        // a point property cannot change kind to satisfy the authority
        if let Target::Property(p) = &output_selector.target {
            if output_kind != p.kind() {
                return Err(PrepareError::TypeInferenceFailed);
            }
        }

        let mut is_new_attribute = false;
        if let Target::Attribute(name) = &output_selector.target {
            if existing.is_none() {
                is_new_attribute = true;
            }
            target.with_output_mut(|t| t.ensure_attribute(name, output_kind));
        }

        let mut c_desc =
            ProxyDescriptor::capture(target, &output_selector, IoSide::Out, ProxyRole::Write)?;

        // every stream works at the output's working kind
        let working = output_selector.working_kind(c_desc.real_kind);
        a_desc.working_kind = working;
        c_desc.working_kind = working;
        if let Some(d) = b_desc.as_mut() {
            d.working_kind = working;
        }

        let a = StreamProxy::from_descriptor(&a_desc);
        let b = b_desc.as_ref().map(StreamProxy::from_descriptor);
        let c = StreamProxy::from_descriptor(&c_desc);
        let blender = ProxyBlender::new(
            config.blend_mode,
            a,
            b,
            c,
            config.reset_value_before_multi,
        )?;

        Ok(BlendOperation {
            op_idx,
            mode: config.blend_mode,
            output_mode: config.output_mode,
            is_new_attribute,
            output_selector,
            blender,
            lut,
            weight,
        })
    }

    fn weight_at(&self, idx: usize) -> f64 {
        match &self.weight {
            WeightReader::Constant(w) => *w,
            WeightReader::Stream(s) => {
                attriblend_api_core::coercion::to_double(&s.read(idx))
            }
        }
    }

    /// Pairwise blend with an explicit weight. The weight curve applies here
    /// and in every other entry point, never deeper down.
    pub fn blend(&self, source: usize, target: usize, weight: f64) {
        self.blender
            .blend(source, target, target, self.lut.eval(weight));
    }

    /// Pairwise blend weighted by this operation's own weight input.
    pub fn blend_auto_weight(&self, source: usize, target: usize) {
        let w = self.weight_at(target);
        self.blend(source, target, w);
    }

    pub fn begin_multi(&self, target: usize) -> OpStats {
        self.blender.begin_multi(target)
    }

    pub fn multi_blend(&self, source: usize, target: usize, weight: f64, stats: &mut OpStats) {
        self.blender
            .multi_blend(source, target, self.lut.eval(weight), stats);
    }

    pub fn end_multi(&self, target: usize, stats: &mut OpStats) {
        self.blender.end_multi(target, stats);
    }

    pub fn div(&self, target: usize, divisor: f64) {
        self.blender.div(target, divisor);
    }

    pub fn output_buffer(&self) -> Option<&str> {
        self.blender.output_buffer()
    }

    /// Settle output buffer lifecycles: transient buffers are disabled and
    /// registered for cleanup, everything else is (re-)enabled.
    pub fn complete_work(&self, target: &Dataset, disabled: &mut HashSet<String>) {
        if let Some(name) = self.output_buffer() {
            match self.output_mode {
                OutputMode::Transient => {
                    target.with_output_mut(|t| t.set_attribute_enabled(name, false));
                    disabled.insert(name.to_string());
                }
                _ => {
                    target.with_output_mut(|t| t.set_attribute_enabled(name, true));
                    disabled.remove(name);
                }
            }
        }
    }

}

impl std::fmt::Debug for BlendOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlendOperation")
            .field("op_idx", &self.op_idx)
            .field("mode", &self.mode)
            .field("output_mode", &self.output_mode)
            .field("output_selector", &self.output_selector)
            .finish()
    }
}

// sibling resolution

/// Rewrite `#Previous` / `#N` operand selectors into the concrete output
/// selector of the referenced sibling. Must run over the complete config
/// list before any operation is prepared; only backward references resolve.
pub fn resolve_sibling_selectors(configs: &mut [BlendOpConfig]) -> Result<(), PrepareError> {
    let len = configs.len();
    for i in 0..len {
        for pick in [0usize, 1usize] {
            let sel = match pick {
                0 => Some(configs[i].operand_a.clone()),
                _ => configs[i].operand_b.clone(),
            };
            let Some(sel) = sel else { continue };
            let Target::Sibling(r) = sel.target else {
                continue;
            };
            let j = match r {
                attriblend_api_core::SiblingRef::Previous => {
                    if i == 0 {
                        return Err(PrepareError::NoPreviousOperation);
                    }
                    i - 1
                }
                attriblend_api_core::SiblingRef::Index(n) => {
                    if n == i {
                        return Err(PrepareError::SelfReferenceNotAllowed { index: i });
                    }
                    if n > i || n >= len {
                        return Err(PrepareError::InvalidSiblingIndex { index: n, len });
                    }
                    n
                }
            };
            let resolved = configs[j].resolved_output_selector()?;
            match pick {
                0 => {
                    configs[i].operand_a = resolved;
                    configs[i].operand_a_from_sibling = true;
                }
                _ => {
                    configs[i].operand_b = Some(resolved);
                    configs[i].operand_b_from_sibling = true;
                }
            }
        }
    }
    Ok(())
}
