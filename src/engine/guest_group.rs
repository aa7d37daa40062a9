// ==========================================
// 例会分桌轮换系统 - 来宾组构建
// ==========================================
// 职责: 将未入座来宾按介绍人分组
// 规则: 按名册顺序单次遍历；每个介绍人只处理一次；每人至多属于一组
// 红线: 来宾组整体入座，不拆分
// ==========================================

use crate::domain::participant::Participant;
use std::collections::HashSet;

// ==========================================
// GuestGroup - 来宾组 {介绍人, 来宾...}
// ==========================================
#[derive(Debug, Clone)]
pub struct GuestGroup<'a> {
    pub introducer: &'a Participant,
    pub guests: Vec<&'a Participant>,
}

impl<'a> GuestGroup<'a> {
    /// 介绍人在前，来宾按名册顺序在后
    pub fn members(&self) -> impl Iterator<Item = &'a Participant> + '_ {
        std::iter::once(self.introducer).chain(self.guests.iter().copied())
    }

    pub fn len(&self) -> usize {
        1 + self.guests.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn member_names(&self) -> Vec<String> {
        self.members().map(|m| m.name.clone()).collect()
    }
}

/// 分组结果: (来宾组, 未分组的剩余候选)
pub type GroupingResult<'a> = (Vec<GuestGroup<'a>>, Vec<&'a Participant>);

// ==========================================
// GuestGroupBuilder
// ==========================================
pub struct GuestGroupBuilder;

impl GuestGroupBuilder {
    /// 对未入座候选池分组
    ///
    /// # 参数
    /// - `pool`: 本轮尚未入座的参加者（名册顺序）
    ///
    /// # 返回
    /// (来宾组列表, 剩余个人候选)
    ///
    /// 介绍人不在候选池中（缺席或已手动入座）时，来宾不成组，按个人候选处理
    pub fn build<'a>(pool: &[&'a Participant]) -> GroupingResult<'a> {
        let mut groups = Vec::new();
        let mut grouped: HashSet<&str> = HashSet::new();

        for candidate in pool {
            if grouped.contains(candidate.name.as_str()) {
                continue;
            }
            let Some(introducer_name) = candidate.guest_introducer() else {
                continue;
            };
            let Some(introducer) = pool.iter().copied().find(|p| p.name == introducer_name) else {
                continue;
            };
            if grouped.contains(introducer.name.as_str()) {
                continue;
            }

            let guests: Vec<&'a Participant> = pool
                .iter()
                .copied()
                .filter(|p| {
                    p.name != introducer.name
                        && p.guest_introducer() == Some(introducer.name.as_str())
                        && !grouped.contains(p.name.as_str())
                })
                .collect();

            let group = GuestGroup {
                introducer,
                guests,
            };
            for member in group.members() {
                grouped.insert(member.name.as_str());
            }
            groups.push(group);
        }

        let remaining = pool
            .iter()
            .copied()
            .filter(|p| !grouped.contains(p.name.as_str()))
            .collect();

        (groups, remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MembershipTier;

    fn guest(name: &str, introducer: &str) -> Participant {
        Participant::new(name, "本会場", MembershipTier::Guest).introduced_by(introducer)
    }

    fn regular(name: &str) -> Participant {
        Participant::new(name, "本会場", MembershipTier::RegularOrAbove)
    }

    #[test]
    fn test_groups_guests_by_introducer() {
        let i1 = regular("I1");
        let i2 = regular("I2");
        let g1 = guest("G1", "I1");
        let g2 = guest("G2", "I2");
        let g3 = guest("G3", "I1");
        let other = regular("X");
        let pool = vec![&g1, &i1, &other, &g2, &g3, &i2];

        let (groups, remaining) = GuestGroupBuilder::build(&pool);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].member_names(), vec!["I1", "G1", "G3"]);
        assert_eq!(groups[1].member_names(), vec!["I2", "G2"]);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "X");
    }

    #[test]
    fn test_missing_introducer_leaves_guest_individual() {
        let g = guest("G", "I");
        let other = regular("X");
        let pool = vec![&g, &other];

        let (groups, remaining) = GuestGroupBuilder::build(&pool);

        assert!(groups.is_empty());
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_non_guest_with_introducer_is_not_grouped() {
        let i = regular("I");
        let associate = Participant::new("A", "本会場", MembershipTier::Associate).introduced_by("I");
        let pool = vec![&i, &associate];

        let (groups, remaining) = GuestGroupBuilder::build(&pool);

        assert!(groups.is_empty());
        assert_eq!(remaining.len(), 2);
    }
}
