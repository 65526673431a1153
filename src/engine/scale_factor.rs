// ==========================================
// 备件库存规划 - 机群规模系数
// ==========================================
// 规则: 机台数 → 系数（阶梯函数，单调不减，25 台及以上封顶 2.0）
//   <5 → 1.0 | 5-9 → 1.25 | 10-14 → 1.5 | 15-19 → 1.75 | 20-24 → 2.0 | ≥25 → 2.0
// 推荐备件数 = ceil(单机最大备件数 × 系数)
// ==========================================

/// 阶梯下限 → 系数（从高到低）
pub const SCALE_TIERS: [(usize, f64); 5] = [(25, 2.0), (20, 2.0), (15, 1.75), (10, 1.5), (5, 1.25)];

/// 系数下限
const BASE_FACTOR: f64 = 1.0;

/// 取整前的小数修正精度（抵消浮点累加误差）
const ROUNDING_PRECISION: f64 = 1e9;

pub fn scale_factor(machine_count: usize) -> f64 {
    SCALE_TIERS
        .iter()
        .find(|(lower, _)| machine_count >= *lower)
        .map(|(_, factor)| *factor)
        .unwrap_or(BASE_FACTOR)
}

/// 推荐备件数（向上取整）
pub fn recommended_spare_qty(max_spare_per_machine: f64, machine_count: usize) -> f64 {
    let raw = max_spare_per_machine * scale_factor(machine_count);
    let snapped = (raw * ROUNDING_PRECISION).round() / ROUNDING_PRECISION;
    snapped.ceil()
}
