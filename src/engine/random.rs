// ==========================================
// 例会分桌轮换系统 - 随机源
// ==========================================
// 职责: 候选洗牌与同分决胜的随机性来源（可注入）
// 红线: 相同输入 + 相同种子 => 相同结果
// ==========================================

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// 引擎使用的随机源接口
pub trait RandomSource {
    /// 以 1/2 概率返回 true（同分时是否替换当前最优桌）
    fn coin_flip(&mut self) -> bool;

    /// 均匀随机洗牌
    fn shuffle<T>(&mut self, items: &mut [T]);
}

// ==========================================
// SeededRandom - 基于 StdRng 的随机源
// ==========================================
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// 固定种子（可复现）
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 系统熵（每次运行不同）
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

// ==========================================
// ScriptedRandom - 脚本化随机源
// ==========================================
// 洗牌保持原顺序；硬币依次取脚本值，耗尽后返回 fallback
pub struct ScriptedRandom {
    flips: VecDeque<bool>,
    fallback: bool,
    flips_used: usize,
}

impl ScriptedRandom {
    pub fn new(flips: &[bool], fallback: bool) -> Self {
        Self {
            flips: flips.iter().copied().collect(),
            fallback,
            flips_used: 0,
        }
    }

    /// 硬币恒为 false：同分时始终保留先枚举到的桌
    pub fn keep_first() -> Self {
        Self::new(&[], false)
    }

    /// 已消耗的硬币次数
    pub fn flips_used(&self) -> usize {
        self.flips_used
    }
}

impl RandomSource for ScriptedRandom {
    fn coin_flip(&mut self) -> bool {
        self.flips_used += 1;
        self.flips.pop_front().unwrap_or(self.fallback)
    }

    fn shuffle<T>(&mut self, _items: &mut [T]) {}
}
