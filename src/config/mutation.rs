use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::TpgError;
use crate::types::Action;
use serde::{Deserialize, Serialize};

/// Parameters for one evolutionary step of a team
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutateParams {
    /// Generation the step belongs to
    pub generation: usize,
    /// Every `rampant_gen` generations run several rounds (0 disables)
    pub rampant_gen: usize,
    pub rampant_min: usize,
    pub rampant_max: usize,

    pub p_lrn_del: f64,
    pub p_lrn_add: f64,
    pub p_lrn_mut: f64,
    pub p_prog_mut: f64,
    pub p_act_mut: f64,
    /// Chance a re-rolled action becomes atomic rather than a team pointer
    pub p_act_atom: f64,

    pub action_codes: Vec<Action>,
    /// Upper bound on team size for additions (0 = unbounded)
    pub max_team_size: usize,
    /// Perturbation magnitude for programs with numeric content
    pub program_step: f64,
}

impl Default for MutateParams {
    fn default() -> Self {
        Self {
            generation: 0,
            rampant_gen: 0,
            rampant_min: 1,
            rampant_max: 1,
            p_lrn_del: 0.7,
            p_lrn_add: 0.6,
            p_lrn_mut: 0.2,
            p_prog_mut: 0.2,
            p_act_mut: 0.1,
            p_act_atom: 0.5,
            action_codes: vec![0, 1, 2, 3],
            max_team_size: 0,
            program_step: 0.5,
        }
    }
}

impl MutateParams {
    /// Params for a specific generation, everything else unchanged
    pub fn for_generation(&self, generation: usize) -> Self {
        Self {
            generation,
            ..self.clone()
        }
    }
}

/// Probabilities that gate a repeated draw must stay below 1.0
pub(crate) fn check_open_probability(name: &'static str, value: f64) -> Result<(), TpgError> {
    if !(0.0..1.0).contains(&value) {
        return Err(TpgError::InvalidProbability { name, value });
    }
    Ok(())
}

pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), TpgError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TpgError::InvalidProbability { name, value });
    }
    Ok(())
}

impl ConfigSection for MutateParams {
    fn section_name() -> &'static str {
        "mutation"
    }

    fn validate(&self) -> Result<(), TpgError> {
        check_open_probability("p_lrn_del", self.p_lrn_del)?;
        check_open_probability("p_lrn_add", self.p_lrn_add)?;
        check_probability("p_lrn_mut", self.p_lrn_mut)?;
        check_probability("p_prog_mut", self.p_prog_mut)?;
        check_probability("p_act_mut", self.p_act_mut)?;
        check_probability("p_act_atom", self.p_act_atom)?;

        if self.p_prog_mut + self.p_act_mut <= 0.0 {
            return Err(TpgError::Configuration(
                "At least one of p_prog_mut and p_act_mut must be positive".to_string(),
            ));
        }
        if self.rampant_gen > 0 && (self.rampant_min == 0 || self.rampant_min > self.rampant_max) {
            return Err(TpgError::Configuration(format!(
                "Rampant rounds must satisfy 1 <= rampant_min <= rampant_max, got [{}, {}]",
                self.rampant_min, self.rampant_max
            )));
        }
        if self.action_codes.is_empty() {
            return Err(TpgError::Configuration(
                "action_codes must contain at least one action".to_string(),
            ));
        }
        if !self.program_step.is_finite() || self.program_step < 0.0 {
            return Err(TpgError::Configuration(format!(
                "program_step must be a finite non-negative number, got {}",
                self.program_step
            )));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: Self::section_name().to_string(),
            fields: vec![
                FieldManifest::integer("rampant_gen", 0, Some(0.0), "Generations between rampant steps (0 disables)"),
                FieldManifest::integer("rampant_min", 1, Some(1.0), "Fewest rounds in a rampant step"),
                FieldManifest::integer("rampant_max", 1, Some(1.0), "Most rounds in a rampant step"),
                FieldManifest::probability("p_lrn_del", 0.7, "Learner deletion probability (< 1)"),
                FieldManifest::probability("p_lrn_add", 0.6, "Learner addition probability (< 1)"),
                FieldManifest::probability("p_lrn_mut", 0.2, "Per-learner mutation probability"),
                FieldManifest::probability("p_prog_mut", 0.2, "Program mutation probability"),
                FieldManifest::probability("p_act_mut", 0.1, "Action re-roll probability"),
                FieldManifest::probability("p_act_atom", 0.5, "Chance a re-rolled action is atomic"),
                FieldManifest::integer("max_team_size", 0, Some(0.0), "Team size cap for additions (0 = none)"),
            ],
        }
    }
}
