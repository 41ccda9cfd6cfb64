use crate::attributes::ProjectAttributes;
use crate::error::Result;
use crate::requirement::{Requirement, RequirementOrigin};
use crate::rules::{baseline_survey, SURVEY_NAME};
use crate::source::RuleSource;
use crate::zoning::ZoningDistrict;

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Turns project attributes into the requirements the project still needs.
///
/// Output order is fixed: the baseline survey, then rule-table entries in
/// rule-definition order, then zoning constraints in the district's stored
/// order. The returned list holds only NEW entries; the caller keeps its
/// existing ones untouched.
pub struct Resolver<S> {
    source: S,
}

impl<S: RuleSource> Resolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fails only when the jurisdiction's rule table cannot be loaded.
    /// Missing attributes make the rules that need them not fire.
    ///
    /// - An existing entry with the same discipline suppresses a rule-derived
    ///   entry; existing and user-entered requirements always win.
    /// - Several rules targeting one requirement name emit it once.
    /// - Zoning entries are filtered by project type and skipped only when
    ///   an existing entry already carries the same name.
    pub fn resolve(
        &self,
        attrs: &ProjectAttributes,
        existing: &[Requirement],
        district: Option<&ZoningDistrict>,
    ) -> Result<Vec<Requirement>> {
        let attrs = attrs.clone().normalized();
        let mut out: Vec<Requirement> = Vec::new();

        if attrs.has_jurisdiction() {
            let rule_set = self.source.load_rules(&attrs.jurisdiction)?;

            if !existing.iter().any(|e| e.has_name(SURVEY_NAME)) {
                out.push(baseline_survey().instantiate(RequirementOrigin::Baseline));
            }

            for rule in rule_set.firing(&attrs) {
                let template = &rule.requirement;
                if let Some(held) = existing.iter().find(|e| e.discipline == template.discipline) {
                    tracing::debug!(
                        rule = %rule.id,
                        discipline = %template.discipline,
                        existing = %held.name,
                        "rule fired but discipline already covered"
                    );
                    continue;
                }
                if out.iter().any(|r| r.has_name(&template.name)) {
                    continue;
                }
                tracing::debug!(rule = %rule.id, requirement = %template.name, "rule fired");
                out.push(template.instantiate(RequirementOrigin::Rule {
                    rule_id: rule.id.clone(),
                }));
            }
        } else {
            tracing::warn!("project has no jurisdiction; only zoning constraints apply");
        }

        if let Some(district) = district {
            for rule in district.rules_for(attrs.project_type) {
                if existing.iter().any(|e| e.has_name(&rule.name)) {
                    continue;
                }
                out.push(rule.to_requirement(&district.code));
            }
        }

        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
