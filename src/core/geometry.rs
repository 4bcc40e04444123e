use crate::domain::model::{Point, Rect, Size};

// 把 `{a,b,...}` 拆成最外層的項目
fn tuple_items(text: &str) -> Option<Vec<&str>> {
    let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?;

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    items.push(inner[start..].trim());
    Some(items)
}

// 允許小數，四捨五入成整數
fn number(item: &str) -> Option<i64> {
    let value: f64 = item.parse().ok()?;
    value.is_finite().then(|| value.round() as i64)
}

fn pair(text: &str) -> Option<(i64, i64)> {
    match tuple_items(text)?.as_slice() {
        [x, y] => Some((number(x)?, number(y)?)),
        _ => None,
    }
}

fn unsigned_pair(text: &str) -> Option<(u32, u32)> {
    let (a, b) = pair(text)?;
    Some((u32::try_from(a).ok()?, u32::try_from(b).ok()?))
}

/// `{x,y}`，可為負數
pub fn parse_point(text: &str) -> Option<Point> {
    pair(text).map(|(x, y)| Point { x, y })
}

/// `{w,h}`，不可為負數
pub fn parse_size(text: &str) -> Option<Size> {
    unsigned_pair(text).map(|(w, h)| Size { w, h })
}

/// `{{x,y},{w,h}}`，不可為負數
pub fn parse_rect(text: &str) -> Option<Rect> {
    match tuple_items(text)?.as_slice() {
        [origin, size] => {
            let (x, y) = unsigned_pair(origin)?;
            let (w, h) = unsigned_pair(size)?;
            Some(Rect { x, y, w, h })
        }
        _ => None,
    }
}
