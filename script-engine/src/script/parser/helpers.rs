//! # 辅助解析函数
//!
//! 手写的字符串解析辅助函数，无正则依赖。

/// 标题编号与其后内容之间可能出现的分隔符
const HEADING_SEPARATORS: &[char] = &['.', ',', ':', ';', '-', '\u{2013}', '\u{2014}'];

/// 检查字符串是否以指定前缀开头（大小写不敏感）
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.chars()
            .zip(prefix.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

/// 解析的标题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading<'a> {
    /// 编号
    pub number: u32,
    /// 编号之后的内容（已去掉分隔符和结尾句点）
    pub remainder: Option<&'a str>,
}

/// 解析形如 `ACT II`、`## Scene 3. A room in the castle` 的标题行
///
/// 关键字后必须紧跟一个可识别的编号（阿拉伯数字、罗马数字或英文序数词），
/// 编号之后只能是行尾或分隔符（`.`、`,`、`:`、`;`、`-`、破折号），
/// 否则不算标题，例如 `Act now, he said`、`Scene one of my life` 不会被误识别。
pub fn parse_heading<'a>(line: &'a str, keywords: &[String]) -> Option<Heading<'a>> {
    let s = line.trim().trim_start_matches('#').trim_start();

    for keyword in keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() || !starts_with_ignore_case(s, keyword) {
            continue;
        }

        let rest = &s[keyword.len()..];
        match rest.chars().next() {
            Some(c) if c.is_whitespace() || c == '.' => {}
            _ => continue,
        }

        let rest = rest.trim_start_matches('.').trim_start();
        let token_end = rest
            .find(|c: char| c.is_whitespace() || HEADING_SEPARATORS.contains(&c))
            .unwrap_or(rest.len());
        let Some(number) = parse_ordinal(&rest[..token_end]) else {
            continue;
        };

        // 编号之后只能是行尾或分隔符，`Scene one of my life` 不是标题
        let after = rest[token_end..].trim_start();
        if after
            .chars()
            .next()
            .is_some_and(|c| !HEADING_SEPARATORS.contains(&c))
        {
            continue;
        }

        let remainder = after
            .trim_start_matches(|c: char| c.is_whitespace() || HEADING_SEPARATORS.contains(&c))
            .trim_end()
            .trim_end_matches('.')
            .trim_end();

        return Some(Heading {
            number,
            remainder: (!remainder.is_empty()).then_some(remainder),
        });
    }

    None
}

/// 解析序号：`3`、`IV`、`three`、`third`
pub fn parse_ordinal(token: &str) -> Option<u32> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse().ok();
    }

    parse_roman(token).or_else(|| parse_number_word(token))
}

/// 解析罗马数字（1..=3999），只接受规范写法
pub fn parse_roman(token: &str) -> Option<u32> {
    let upper = token.to_ascii_uppercase();
    let mut total = 0u32;
    let mut prev = 0u32;

    for c in upper.chars().rev() {
        let value = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if value < prev {
            total = total.checked_sub(value)?;
        } else {
            total += value;
            prev = value;
        }
    }

    // 拒绝 IIII、VX 之类的非规范写法
    (total > 0 && total < 4000 && to_roman(total) == upper).then_some(total)
}

/// 整数转罗马数字
pub fn to_roman(mut n: u32) -> String {
    const TABLE: &[(u32, &str)] = &[
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut out = String::new();
    for &(value, symbol) in TABLE {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}

fn parse_number_word(token: &str) -> Option<u32> {
    const CARDINALS: &[&str] = &[
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
        "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
        "nineteen", "twenty",
    ];
    const ORDINALS: &[&str] = &[
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
        "tenth",
    ];

    let lower = token.to_ascii_lowercase();
    CARDINALS
        .iter()
        .position(|w| *w == lower)
        .or_else(|| ORDINALS.iter().position(|w| *w == lower))
        .map(|i| i as u32 + 1)
}

/// 拆分 `NAME: 台词` 形式的行
///
/// 返回 (候选名字, 台词)。候选名字为空或单词数超过 `max_words` 时返回 `None`。
pub fn split_attribution<'a>(
    line: &'a str,
    separators: &[char],
    max_words: usize,
) -> Option<(&'a str, &'a str)> {
    let s = line.trim();
    let (pos, sep) = s.char_indices().find(|(_, c)| separators.contains(c))?;

    let candidate = s[..pos].trim();
    if candidate.is_empty() || candidate.split_whitespace().count() > max_words {
        return None;
    }

    let text = s[pos + sep.len_utf8()..].trim();
    Some((candidate, text))
}

/// 去掉名字中的括号说明：`HAMLET (aside)` → `HAMLET`
pub fn strip_parenthetical(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}
