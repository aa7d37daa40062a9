// ==========================================
// 例会分桌轮换系统 - 角色分类
// ==========================================
// 职责: 统一的角色判定，供候选顺序与输出排序共用
// ==========================================

use crate::domain::participant::Participant;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Leader,     // 桌长
    Guest,      // 来宾
    Introducer, // 同桌来宾的介绍人
    Caretaker,  // 世话人
    Management, // 运营部
    General,    // 无角色（非运营部/世话人/桌长）
}

impl Role {
    /// 输出排序的判定顺序（先命中者优先）
    pub const DISPLAY_ORDER: [Role; 5] = [
        Role::Leader,
        Role::Guest,
        Role::Introducer,
        Role::Caretaker,
        Role::Management,
    ];

    /// 自动入座的候选分组顺序（之后接他会场/自会场的无角色成员）
    pub const PLACEMENT_ORDER: [Role; 3] = [Role::Management, Role::Caretaker, Role::Leader];

    /// 输出排序优先级（越小越靠前）
    pub fn display_priority(self) -> u8 {
        match self {
            Role::Leader => 0,
            Role::Guest => 1,
            Role::Introducer => 2,
            Role::Caretaker => 3,
            Role::Management => 4,
            Role::General => 5,
        }
    }
}

/// 判定参加者是否具有某角色
///
/// tablemates 仅用于介绍人判定（同桌是否有其介绍的来宾）
pub fn holds_role(participant: &Participant, role: Role, tablemates: &[&Participant]) -> bool {
    match role {
        Role::Leader => participant.is_leader,
        Role::Guest => participant.is_guest(),
        Role::Introducer => tablemates
            .iter()
            .any(|mate| mate.guest_introducer() == Some(participant.name.as_str())),
        Role::Caretaker => participant.is_caretaker,
        Role::Management => participant.is_management,
        Role::General => {
            !(participant.is_management || participant.is_caretaker || participant.is_leader)
        }
    }
}

/// 输出排序使用的主角色
pub fn display_role(participant: &Participant, tablemates: &[&Participant]) -> Role {
    Role::DISPLAY_ORDER
        .into_iter()
        .find(|role| holds_role(participant, *role, tablemates))
        .unwrap_or(Role::General)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MembershipTier;

    #[test]
    fn test_display_role_priority() {
        let leader = Participant::new("L", "本会場", MembershipTier::RegularOrAbove)
            .leader()
            .management();
        let guest = Participant::new("G", "本会場", MembershipTier::Guest).introduced_by("I");
        let introducer = Participant::new("I", "本会場", MembershipTier::RegularOrAbove).management();
        let caretaker = Participant::new("C", "本会場", MembershipTier::Associate)
            .caretaker()
            .management();
        let plain = Participant::new("P", "本会場", MembershipTier::Associate);

        let mates = vec![&leader, &guest, &introducer, &caretaker, &plain];

        assert_eq!(display_role(&leader, &mates), Role::Leader);
        assert_eq!(display_role(&guest, &mates), Role::Guest);
        assert_eq!(display_role(&introducer, &mates), Role::Introducer);
        assert_eq!(display_role(&caretaker, &mates), Role::Caretaker);
        assert_eq!(display_role(&plain, &mates), Role::General);
    }

    #[test]
    fn test_introducer_requires_guest_at_table() {
        let introducer = Participant::new("I", "本会場", MembershipTier::RegularOrAbove);
        let not_guest = Participant::new("X", "本会場", MembershipTier::Associate).introduced_by("I");
        let mates = vec![&introducer, &not_guest];

        assert!(!holds_role(&introducer, Role::Introducer, &mates));
        assert!(holds_role(&introducer, Role::General, &mates));
    }
}
