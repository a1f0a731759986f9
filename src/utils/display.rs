use crate::models::BoardTab;
use regex::Regex;
use std::sync::LazyLock;

/// "姓名 (工号)" 拆分：名字部分非贪婪，括号部分可选
static DISPLAY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*(\(.+\))?$").expect("display name pattern"));

/// 奖项编号转名次：数字编号按数值，"00" 为特奖 0，无法解析的排在最后
///
/// 整串须为数字，"1A" 这类带后缀的编号不取前导数字，同样排在最后
pub fn award_rank(award_id: &str) -> i32 {
    award_id.trim().parse::<i32>().unwrap_or(i32::MAX)
}

/// 名次所属页签
pub fn tab_for_rank(rank: i32) -> BoardTab {
    match rank {
        0..=1 => BoardTab::SpecialTop,
        2..=5 => BoardTab::Tier2To5,
        6..=10 => BoardTab::Tier6To10,
        11..=13 => BoardTab::Tier11To13,
        99 => BoardTab::Comfort,
        _ => BoardTab::Other,
    }
}

/// 看板显示名称: "中文名|英文名|Unknown (工号)"
pub fn display_name(
    emp_id: &str,
    emp_cname: Option<&str>,
    emp_ename: Option<&str>,
) -> String {
    let name = emp_cname
        .filter(|n| !n.is_empty())
        .or(emp_ename.filter(|n| !n.is_empty()))
        .unwrap_or("Unknown");
    format!("{name} ({emp_id})")
}

/// 遮罩姓名中间字符，保留首尾字与括号内工号
///
/// "陳大明 (A001)" -> "陳O明 (A001)"；两个字以内不遮罩
pub fn mask_name(full_name: &str) -> String {
    let Some(caps) = DISPLAY_NAME_RE.captures(full_name) else {
        return full_name.to_string();
    };

    let name_part = caps.get(1).map_or("", |m| m.as_str()).trim();
    let id_part = caps.get(2).map_or("", |m| m.as_str());

    let chars: Vec<char> = name_part.chars().collect();
    if chars.len() <= 2 {
        return full_name.to_string();
    }

    let mut masked = String::with_capacity(name_part.len());
    masked.push(chars[0]);
    masked.extend(std::iter::repeat_n('O', chars.len() - 2));
    masked.push(chars[chars.len() - 1]);

    if id_part.is_empty() {
        masked
    } else {
        format!("{masked} {id_part}")
    }
}
