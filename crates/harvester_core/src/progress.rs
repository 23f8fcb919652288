pub const BAR_WIDTH: usize = 50;
const FILL: char = '█';
const EMPTY: char = '-';

/// A rendered progress line. `complete` is set when `current == total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressLine {
    pub text: String,
    pub permille: u32,
    pub complete: bool,
}

/// Renders `label |████----| 42.0% complete`; `None` when `total` is zero.
///
/// The percentage is floored to one decimal, so it never reads 100.0
/// before the last step.
pub fn render_bar(current: usize, total: usize, label: &str) -> Option<ProgressLine> {
    if total == 0 {
        return None;
    }
    let current = current.min(total);
    let permille = (current as u128 * 1000 / total as u128) as u32;
    let filled = current * BAR_WIDTH / total;

    let mut bar = String::with_capacity(BAR_WIDTH * FILL.len_utf8());
    bar.extend(std::iter::repeat(FILL).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(BAR_WIDTH - filled));

    Some(ProgressLine {
        text: format!("{label} |{bar}| {}.{}% complete", permille / 10, permille % 10),
        permille,
        complete: current == total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_renders_nothing() {
        assert_eq!(render_bar(0, 0, "x"), None);
        assert_eq!(render_bar(3, 0, "x"), None);
    }

    #[test]
    fn half_way_bar() {
        let line = render_bar(1, 2, "wallpapers progress:").unwrap();
        assert_eq!(line.permille, 500);
        assert!(!line.complete);
        assert!(line.text.starts_with("wallpapers progress: |"));
        assert!(line.text.ends_with("| 50.0% complete"));
        assert_eq!(line.text.matches(FILL).count(), 25);
        assert_eq!(line.text.matches(EMPTY).count(), 25);
    }

    #[test]
    fn percentage_is_monotonic_and_hits_100_only_at_end() {
        for total in [1usize, 3, 7, 1000, 10_001] {
            let mut last = 0;
            for current in 0..=total {
                let line = render_bar(current, total, "p").unwrap();
                assert!(line.permille >= last);
                assert_eq!(line.permille == 1000, current == total, "{current}/{total}");
                assert_eq!(line.complete, current == total);
                last = line.permille;
            }
        }
    }

    #[test]
    fn overshoot_is_clamped() {
        let line = render_bar(5, 4, "p").unwrap();
        assert!(line.complete);
        assert!(line.text.ends_with("100.0% complete"));
    }
}
