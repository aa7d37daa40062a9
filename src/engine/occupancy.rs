// ==========================================
// 例会分桌轮换系统 - 目标人数
// ==========================================
// 规则: target_min = floor(N/T), target_max = target_min + (N mod T > 0 ? 1 : 0)
// 红线: 同一 (min,max) 统一适用于所有桌，余数席不绑定特定桌
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOccupancy {
    pub min: usize,
    pub max: usize,
}

impl TargetOccupancy {
    /// 由名册人数与桌数计算目标人数范围
    ///
    /// table_count 为 0 时按 1 桌处理（设定校验会先行拒绝）
    pub fn for_roster(roster_size: usize, table_count: usize) -> Self {
        let tables = table_count.max(1);
        let min = roster_size / tables;
        let max = min + usize::from(roster_size % tables > 0);
        Self { min, max }
    }

    /// 人数是否在 [min, max] 内
    pub fn contains(&self, size: usize) -> bool {
        (self.min..=self.max).contains(&size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let target = TargetOccupancy::for_roster(12, 4);
        assert_eq!(target, TargetOccupancy { min: 3, max: 3 });
        assert!(target.contains(3));
        assert!(!target.contains(4));
    }

    #[test]
    fn test_remainder_widens_max() {
        let target = TargetOccupancy::for_roster(13, 4);
        assert_eq!(target, TargetOccupancy { min: 3, max: 4 });
        assert!(target.contains(4));
        assert!(!target.contains(5));
    }

    #[test]
    fn test_fewer_participants_than_tables() {
        let target = TargetOccupancy::for_roster(2, 4);
        assert_eq!(target, TargetOccupancy { min: 0, max: 1 });
    }
}
