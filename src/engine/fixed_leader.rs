// ==========================================
// 例会分桌轮换系统 - 桌长固定卓番
// ==========================================
// 职责: 每次运行推导一次桌长 -> 卓番（取第1轮指定）
// 红线: 桌长缺第1轮指定 => 整体中止
// ==========================================

use crate::domain::finding::{
    EvaluationFinding, FindingCategory, FindingDetail, FindingScope, Severity,
};
use crate::domain::participant::{Participant, PREFERENCE_ROTATIONS};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct FixedLeaderAssignment {
    tables: HashMap<String, String>, // 桌长姓名 -> 卓番
}

impl FixedLeaderAssignment {
    /// 推导桌长固定卓番
    ///
    /// # 返回
    /// (固定卓番, 第2/3轮指定不一致的警告)
    pub fn derive(roster: &[Participant]) -> EngineResult<(Self, Vec<EvaluationFinding>)> {
        let mut tables = HashMap::new();
        let mut findings = Vec::new();

        for leader in roster.iter().filter(|p| p.is_leader) {
            let fixed = leader
                .preference_for(1)
                .ok_or_else(|| EngineError::LeaderWithoutPreference {
                    leader: leader.name.clone(),
                })?;

            for rotation in 2..=PREFERENCE_ROTATIONS as u32 {
                let Some(requested) = leader.preference_for(rotation) else {
                    continue;
                };
                if requested != fixed {
                    warn!(
                        leader = %leader.name,
                        rotation,
                        requested,
                        fixed,
                        "桌长指定卓番与第1轮不一致，固定为第1轮卓番"
                    );
                    findings.push(EvaluationFinding::new(
                        FindingScope::Run,
                        FindingCategory::LeaderPreference,
                        Severity::Warning,
                        FindingDetail::LeaderPreferenceMismatch {
                            leader: leader.name.clone(),
                            rotation,
                            requested: requested.to_string(),
                            fixed: fixed.to_string(),
                        },
                    ));
                }
            }

            tables.insert(leader.name.clone(), fixed.to_string());
        }

        Ok((Self { tables }, findings))
    }

    pub fn table_for(&self, leader: &str) -> Option<&str> {
        self.tables.get(leader).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MembershipTier;

    fn leader(name: &str) -> Participant {
        Participant::new(name, "本会場", MembershipTier::RegularOrAbove).leader()
    }

    #[test]
    fn test_first_rotation_preference_wins() {
        let roster = vec![
            leader("L1").prefer(1, "B").prefer(2, "C").prefer(3, "B"),
            leader("L2").prefer(1, "A"),
            Participant::new("X", "本会場", MembershipTier::Associate).prefer(1, "D"),
        ];

        let (fixed, findings) = FixedLeaderAssignment::derive(&roster).unwrap();

        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed.table_for("L1"), Some("B"));
        assert_eq!(fixed.table_for("L2"), Some("A"));
        assert_eq!(fixed.table_for("X"), None);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].scope, FindingScope::Run);
        assert_eq!(
            findings[0].detail,
            FindingDetail::LeaderPreferenceMismatch {
                leader: "L1".to_string(),
                rotation: 2,
                requested: "C".to_string(),
                fixed: "B".to_string(),
            }
        );
    }

    #[test]
    fn test_leader_without_first_preference_aborts() {
        let roster = vec![leader("L1").prefer(2, "A")];

        let err = FixedLeaderAssignment::derive(&roster).unwrap_err();
        assert_eq!(
            err,
            EngineError::LeaderWithoutPreference {
                leader: "L1".to_string()
            }
        );
    }
}
