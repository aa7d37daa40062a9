// ==========================================
// 例会分桌轮换系统 - 评价生成器
// ==========================================
// 职责: 对每轮已完成的桌进行规则适合性评价
// 输入: 本轮全部桌（卓番顺序）
// 输出: 结构化评价结论（桌级 + 轮级）
// ==========================================
// 桌级检查顺序固定:
// 1) 桌长在席 2) 来宾与介绍人 3) 人数 4) 同一他会场 5) 会场比例 6) 过去同桌
// 轮级: 运营部 / 世话人分布是否均等
// ==========================================

mod core;


pub use core::RotationEvaluator;
