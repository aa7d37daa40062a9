// ==========================================
// 例会分桌轮换系统 - 参加者领域模型
// ==========================================
// 职责: 本月名册中的参加者（一次运行内不可变）
// 红线: 姓名在名册内唯一
// ==========================================

use crate::domain::types::MembershipTier;
use serde::{Deserialize, Serialize};

/// 手动卓番指定只覆盖前三轮
pub const PREFERENCE_ROTATIONS: usize = 3;

// ==========================================
// Participant - 参加者
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    // ===== 身份 =====
    pub name: String,                 // 姓名（名册内唯一）
    pub venue: String,                // 所属会场（导入时已补全）
    pub membership: MembershipTier,   // 会员区分

    // ===== 手动卓番 =====
    pub preferences: [Option<String>; PREFERENCE_ROTATIONS], // 第1~3轮指定卓番（大写字母）

    // ===== 角色标记 =====
    pub is_management: bool,          // 运营部
    pub is_caretaker: bool,           // 世话人
    pub is_leader: bool,              // 桌长（全轮固定）

    // ===== 来宾 =====
    pub introducer: Option<String>,   // 介绍人（仅来宾有意义）
}

impl Participant {
    /// 创建无角色、无指定卓番的参加者
    pub fn new(name: &str, venue: &str, membership: MembershipTier) -> Self {
        Self {
            name: name.to_string(),
            venue: venue.to_string(),
            membership,
            preferences: [None, None, None],
            is_management: false,
            is_caretaker: false,
            is_leader: false,
            introducer: None,
        }
    }

    pub fn leader(mut self) -> Self {
        self.is_leader = true;
        self
    }

    pub fn management(mut self) -> Self {
        self.is_management = true;
        self
    }

    pub fn caretaker(mut self) -> Self {
        self.is_caretaker = true;
        self
    }

    pub fn introduced_by(mut self, introducer: &str) -> Self {
        self.introducer = Some(introducer.to_string());
        self
    }

    /// 设置第 rotation 轮（1 起）的指定卓番，超出前三轮时忽略
    pub fn prefer(mut self, rotation: u32, table: &str) -> Self {
        if let Some(slot) = rotation
            .checked_sub(1)
            .and_then(|idx| self.preferences.get_mut(idx as usize))
        {
            *slot = Some(table.trim().to_uppercase());
        }
        self
    }

    /// 第 rotation 轮（1 起）的指定卓番
    pub fn preference_for(&self, rotation: u32) -> Option<&str> {
        let idx = rotation.checked_sub(1)? as usize;
        self.preferences.get(idx)?.as_deref()
    }

    pub fn is_guest(&self) -> bool {
        self.membership == MembershipTier::Guest
    }

    /// 是否来自其他会场
    pub fn is_other_venue(&self, self_venue: &str) -> bool {
        self.venue != self_venue
    }

    /// 来宾的介绍人（非来宾或介绍人为空时返回 None）
    pub fn guest_introducer(&self) -> Option<&str> {
        if !self.is_guest() {
            return None;
        }
        self.introducer
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_for_rotation() {
        let p = Participant::new("佐藤", "本会場", MembershipTier::RegularOrAbove)
            .prefer(1, "b")
            .prefer(3, "C")
            .prefer(4, "D");

        assert_eq!(p.preference_for(1), Some("B"));
        assert_eq!(p.preference_for(2), None);
        assert_eq!(p.preference_for(3), Some("C"));
        assert_eq!(p.preference_for(4), None);
        assert_eq!(p.preference_for(0), None);
    }

    #[test]
    fn test_guest_introducer_only_for_guests() {
        let guest = Participant::new("G", "本会場", MembershipTier::Guest).introduced_by("I");
        let member = Participant::new("M", "本会場", MembershipTier::Associate).introduced_by("I");
        let blank = Participant::new("B", "本会場", MembershipTier::Guest).introduced_by("  ");

        assert_eq!(guest.guest_introducer(), Some("I"));
        assert_eq!(member.guest_introducer(), None);
        assert_eq!(blank.guest_introducer(), None);
    }
}
