//! Action step compiler.
//!
//! Effect hooks are authored as loose maps tagged by `type`:
//!
//! ```ron
//! {"type": "deal_damage", "target": "owner", "amount": {"source": "source_attack", "multiplier": "potency"}}
//! {"type": "heal", "target": "owner", "amount": "effect.potency * 100"}
//! {"type": "set_flag", "target": "owner", "flag_name": "is_stunned", "value": true}
//! {"type": "modify_attribute", "returns": {"ratio": "1 + effect.potency", "flat": 0}}
//! ```
//!
//! Values are either a number, an arithmetic expression string, or a map
//! naming a `source`. Expressions are parsed here, so a malformed one fails
//! the load instead of the battle. Unrecognised `type` tags compile into
//! [`ActionStep::Unknown`] and are skipped at run time.

use std::collections::BTreeMap;

use combat_core::{
    ActionStep, ContextKey, Expr, ExprError, Multiplier, ParamValue, TargetRef, ValueSource,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Loosely typed value as it appears in content files.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
    Map(BTreeMap<String, RawValue>),
}

impl RawValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

/// One step as written in a content file.
pub type RawStep = BTreeMap<String, RawValue>;

#[derive(Debug, Error)]
pub enum ActionSpecError {
    #[error("action step has no `type` tag")]
    MissingType,

    #[error("`{tag}` step is missing `{field}`")]
    MissingField { tag: String, field: &'static str },

    #[error("`{tag}` step has an invalid `{field}`: {reason}")]
    InvalidValue {
        tag: String,
        field: &'static str,
        reason: String,
    },

    #[error("`{tag}` step has a malformed expression in `{field}`")]
    Expr {
        tag: String,
        field: &'static str,
        #[source]
        source: ExprError,
    },
}

/// Compiles a list of raw steps, failing on the first malformed one.
pub fn compile_steps(raw: &[RawStep]) -> Result<Vec<ActionStep>, ActionSpecError> {
    raw.iter().map(compile_step).collect()
}

pub fn compile_step(raw: &RawStep) -> Result<ActionStep, ActionSpecError> {
    let tag = match raw.get("type") {
        Some(RawValue::Text(tag)) => tag.to_ascii_lowercase(),
        _ => return Err(ActionSpecError::MissingType),
    };
    let step = StepFields { tag: &tag, raw };

    Ok(match tag.as_str() {
        ActionStep::DEAL_DAMAGE => ActionStep::DealDamage {
            target: step.target()?,
            amount: step.value("amount")?,
        },
        ActionStep::HEAL => ActionStep::Heal {
            target: step.target()?,
            amount: step.value("amount")?,
        },
        ActionStep::CLEAR_EFFECTS => ActionStep::ClearEffects {
            target: step.target()?,
        },
        ActionStep::SET_FLAG => ActionStep::SetFlag {
            target: step.target()?,
            flag: step.flag_name()?,
            value: step.scalar("value")?,
        },
        ActionStep::MODIFY_ATTRIBUTE => {
            let (ratio, flat) = step.returns()?;
            ActionStep::ModifyAttribute { ratio, flat }
        }
        _ => {
            warn!(target: "combat::content", "unknown action type '{tag}' kept as a no-op");
            ActionStep::Unknown { tag: tag.clone() }
        }
    })
}

struct StepFields<'a> {
    tag: &'a str,
    raw: &'a RawStep,
}

impl StepFields<'_> {
    fn require(&self, field: &'static str) -> Result<&RawValue, ActionSpecError> {
        self.raw.get(field).ok_or_else(|| ActionSpecError::MissingField {
            tag: self.tag.to_owned(),
            field,
        })
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> ActionSpecError {
        ActionSpecError::InvalidValue {
            tag: self.tag.to_owned(),
            field,
            reason: reason.into(),
        }
    }

    fn target(&self) -> Result<TargetRef, ActionSpecError> {
        match self.require("target")? {
            RawValue::Text(name) => Ok(TargetRef::parse(name)),
            other => Err(self.invalid("target", format!("expected a string, got a {}", other.kind()))),
        }
    }

    fn flag_name(&self) -> Result<String, ActionSpecError> {
        let value = match self.raw.get("flag_name").or_else(|| self.raw.get("flag")) {
            Some(value) => value,
            None => {
                return Err(ActionSpecError::MissingField {
                    tag: self.tag.to_owned(),
                    field: "flag_name",
                });
            }
        };
        match value {
            RawValue::Text(name) => Ok(name.clone()),
            other => Err(self.invalid("flag_name", format!("expected a string, got a {}", other.kind()))),
        }
    }

    fn scalar(&self, field: &'static str) -> Result<ParamValue, ActionSpecError> {
        match self.require(field)? {
            RawValue::Bool(value) => Ok(ParamValue::Bool(*value)),
            RawValue::Number(value) => Ok(ParamValue::Number(*value)),
            RawValue::Text(value) => Ok(ParamValue::Text(value.clone())),
            other => Err(self.invalid(field, format!("expected a scalar, got a {}", other.kind()))),
        }
    }

    fn value(&self, field: &'static str) -> Result<ValueSource, ActionSpecError> {
        self.compile_value(field, self.require(field)?)
    }

    fn returns(&self) -> Result<(ValueSource, ValueSource), ActionSpecError> {
        let returns = match self.raw.get("returns") {
            None => return Ok((ValueSource::Literal(1.0), ValueSource::Literal(0.0))),
            Some(RawValue::Map(returns)) => returns,
            Some(other) => {
                return Err(self.invalid("returns", format!("expected a map, got a {}", other.kind())));
            }
        };
        let ratio = match returns.get("ratio") {
            Some(value) => self.compile_value("returns.ratio", value)?,
            None => ValueSource::Literal(1.0),
        };
        let flat = match returns.get("flat") {
            Some(value) => self.compile_value("returns.flat", value)?,
            None => ValueSource::Literal(0.0),
        };
        Ok((ratio, flat))
    }

    fn compile_value(
        &self,
        field: &'static str,
        value: &RawValue,
    ) -> Result<ValueSource, ActionSpecError> {
        match value {
            RawValue::Number(number) => Ok(ValueSource::Literal(*number)),
            RawValue::Text(source) => Expr::parse(source)
                .map(ValueSource::Expr)
                .map_err(|source| ActionSpecError::Expr {
                    tag: self.tag.to_owned(),
                    field,
                    source,
                }),
            RawValue::Map(reference) => self.compile_reference(field, reference),
            other => Err(self.invalid(field, format!("a {} is not a value", other.kind()))),
        }
    }

    fn compile_reference(
        &self,
        field: &'static str,
        reference: &BTreeMap<String, RawValue>,
    ) -> Result<ValueSource, ActionSpecError> {
        let source = match reference.get("source") {
            Some(RawValue::Text(source)) => source.as_str(),
            _ => return Err(self.invalid(field, "value reference needs a `source` string")),
        };

        if source == "source_attack" {
            let multiplier = match reference.get("multiplier") {
                None => Multiplier::Literal(1.0),
                Some(RawValue::Number(value)) => Multiplier::Literal(*value),
                Some(RawValue::Text(param)) => Multiplier::Param(param.clone()),
                Some(other) => {
                    return Err(self.invalid(
                        field,
                        format!("multiplier must be a number or a parameter name, got a {}", other.kind()),
                    ));
                }
            };
            return Ok(ValueSource::SourceAttack { multiplier });
        }

        match reference.get("value") {
            Some(RawValue::Text(name)) => Ok(ValueSource::Field {
                object: ContextKey::parse(source),
                field: name.clone(),
            }),
            _ => Err(self.invalid(field, format!("reference to '{source}' needs a `value` field name"))),
        }
    }
}
