// ==========================================
// 备件库存规划 - 输出 sheet 命名
// ==========================================
// 规则:
// - 最长 31 个字符，超出截断
// - 不允许的字符 []:*?/\ 替换为 _，首尾单引号去除
// - 截断后重名（忽略大小写）追加 ~2、~3 ...，总长度仍不超过 31
// ==========================================

use std::collections::HashSet;

pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
const FALLBACK_NAME: &str = "Sheet";

/// 清理非法字符并截断
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    let truncated = truncate_chars(cleaned, MAX_SHEET_NAME_LEN);
    if truncated.trim().is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        truncated
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// 工作簿内 sheet 名分配器
#[derive(Debug, Default)]
pub struct SheetNameAllocator {
    used: HashSet<String>, // 已用名（小写）
}

impl SheetNameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配唯一的 sheet 名
    pub fn allocate(&mut self, name: &str) -> String {
        let base = sanitize_sheet_name(name);
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!("~{}", n);
            let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let candidate = format!("{}{}", truncate_chars(&base, keep), suffix);
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}
