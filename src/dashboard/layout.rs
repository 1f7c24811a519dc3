use crate::dashboard::config::{WidgetConfig, WidgetSpan};
use serde_json::Value;

/// Width breakpoints for the responsive column count.
pub const SMALL_BREAKPOINT: f32 = 520.0;
pub const MEDIUM_BREAKPOINT: f32 = 900.0;

/// Enabled widgets ordered by `position`. The sort is stable, so equal
/// positions keep their collection order.
pub fn enabled_sorted(widgets: &[WidgetConfig]) -> Vec<&WidgetConfig> {
    let mut enabled: Vec<&WidgetConfig> = widgets.iter().filter(|w| w.enabled).collect();
    enabled.sort_by_key(|w| w.position);
    enabled
}

/// Move `active` to the slot currently held by `over` among the enabled
/// widgets and renumber their positions densely from zero.
///
/// Returns `None` when nothing should change: no target, a drop onto itself,
/// or an id that is not an enabled widget. Disabled widgets keep their
/// `position` and the collection keeps its array order.
pub fn reorder_widgets(
    widgets: &[WidgetConfig],
    active: &str,
    over: Option<&str>,
) -> Option<Vec<WidgetConfig>> {
    let over = over?;
    if active == over {
        return None;
    }
    let mut order: Vec<&str> = enabled_sorted(widgets)
        .into_iter()
        .map(|w| w.id.as_str())
        .collect();
    let from = order.iter().position(|id| *id == active)?;
    let to = order.iter().position(|id| *id == over)?;
    let moved = order.remove(from);
    order.insert(to, moved);

    let next = widgets
        .iter()
        .map(|w| {
            let mut w = w.clone();
            if w.enabled {
                if let Some(idx) = order.iter().position(|id| *id == w.id) {
                    w.position = idx as u32;
                }
            }
            w
        })
        .collect();
    Some(next)
}

/// Copy of `widgets` with the enabled flag of `id` replaced.
pub fn set_enabled(widgets: &[WidgetConfig], id: &str, enabled: bool) -> Vec<WidgetConfig> {
    widgets
        .iter()
        .map(|w| {
            if w.id == id {
                WidgetConfig {
                    enabled,
                    ..w.clone()
                }
            } else {
                w.clone()
            }
        })
        .collect()
}

/// Copy of `widgets` with the span of `id` replaced.
pub fn set_span(widgets: &[WidgetConfig], id: &str, span: WidgetSpan) -> Vec<WidgetConfig> {
    widgets
        .iter()
        .map(|w| {
            if w.id == id {
                WidgetConfig {
                    span,
                    ..w.clone()
                }
            } else {
                w.clone()
            }
        })
        .collect()
}

/// Expand/collapse toggle: any span larger than one cell collapses to 1x1,
/// a single cell expands to 2x2.
pub fn toggled_span(span: WidgetSpan) -> WidgetSpan {
    if span.is_expanded() {
        WidgetSpan::SMALL
    } else {
        WidgetSpan::LARGE
    }
}

pub fn column_count(width: f32) -> usize {
    if width < SMALL_BREAKPOINT {
        1
    } else if width < MEDIUM_BREAKPOINT {
        2
    } else {
        3
    }
}

/// Cell range assigned to a widget by [`place_widgets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

/// Place spans on a grid with `cols` columns. Each span takes the first free
/// cell range in row-major order; column spans are clamped to the grid width
/// and rows grow as needed. Returns the placements and the number of rows used.
pub fn place_widgets(spans: &[WidgetSpan], cols: usize) -> (Vec<Placement>, usize) {
    let cols = cols.max(1);
    let mut occupied: Vec<Vec<bool>> = Vec::new();
    let mut placements = Vec::with_capacity(spans.len());

    for span in spans {
        let col_span = (span.cols.max(1) as usize).min(cols);
        let row_span = span.rows.max(1) as usize;
        let mut row = 0;
        let placement = loop {
            let free_col = (0..=cols - col_span)
                .find(|&col| is_free(&occupied, row, col, row_span, col_span));
            if let Some(col) = free_col {
                break Placement {
                    row,
                    col,
                    row_span,
                    col_span,
                };
            }
            row += 1;
        };
        mark(&mut occupied, cols, &placement);
        placements.push(placement);
    }

    let rows = occupied.len();
    (placements, rows)
}

fn is_free(occupied: &[Vec<bool>], row: usize, col: usize, row_span: usize, col_span: usize) -> bool {
    for r in row..row + row_span {
        let Some(cells) = occupied.get(r) else {
            continue;
        };
        for c in col..col + col_span {
            if cells[c] {
                return false;
            }
        }
    }
    true
}

fn mark(occupied: &mut Vec<Vec<bool>>, cols: usize, p: &Placement) {
    while occupied.len() < p.row + p.row_span {
        occupied.push(vec![false; cols]);
    }
    for r in p.row..p.row + p.row_span {
        for c in p.col..p.col + p.col_span {
            occupied[r][c] = true;
        }
    }
}

/// Shallow merge of two JSON objects; keys in `updates` win. Non-object
/// inputs yield `updates`.
pub fn merge_json(base: &Value, updates: &Value) -> Value {
    match (base, updates) {
        (Value::Object(a), Value::Object(b)) => {
            let mut merged = a.clone();
            for (k, v) in b {
                merged.insert(k.clone(), v.clone());
            }
            Value::Object(merged)
        }
        _ => updates.clone(),
    }
}

/// Props as handed to a renderer: the stored props with the dashboard-wide
/// density flag layered on top. The stored value is never modified.
pub fn effective_props(props: &Value, compact: bool) -> Value {
    let base = if props.is_object() {
        props.clone()
    } else {
        Value::Object(Default::default())
    };
    merge_json(&base, &serde_json::json!({ "compact": compact }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::config::WidgetKind;
    use serde_json::json;

    fn widget(id: &str, position: u32, enabled: bool) -> WidgetConfig {
        WidgetConfig::new(id, WidgetKind::StatsOverview, position).with_enabled(enabled)
    }

    fn positions(widgets: &[WidgetConfig]) -> Vec<(String, u32)> {
        widgets.iter().map(|w| (w.id.clone(), w.position)).collect()
    }

    #[test]
    fn enabled_sorted_is_stable() {
        let widgets = vec![widget("a", 1, true), widget("b", 0, true), widget("c", 1, true)];
        let ids: Vec<&str> = enabled_sorted(&widgets).iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn moving_first_after_last_renumbers() {
        let widgets = vec![widget("A", 0, true), widget("B", 1, true), widget("C", 2, true)];
        let next = reorder_widgets(&widgets, "A", Some("C")).unwrap();
        assert_eq!(
            positions(&next),
            vec![("A".into(), 2), ("B".into(), 0), ("C".into(), 1)]
        );
    }

    #[test]
    fn moving_last_to_front_is_a_move_not_a_swap() {
        let widgets = vec![
            widget("A", 0, true),
            widget("B", 1, true),
            widget("C", 2, true),
            widget("D", 3, true),
        ];
        let next = reorder_widgets(&widgets, "D", Some("A")).unwrap();
        let ids: Vec<&str> = enabled_sorted(&next).iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["D", "A", "B", "C"]);
    }

    #[test]
    fn disabled_positions_untouched() {
        let widgets = vec![
            widget("A", 0, true),
            widget("X", 7, false),
            widget("B", 4, true),
            widget("Y", 1, false),
            widget("C", 9, true),
        ];
        let next = reorder_widgets(&widgets, "A", Some("C")).unwrap();
        assert_eq!(
            positions(&next),
            vec![
                ("A".into(), 2),
                ("X".into(), 7),
                ("B".into(), 0),
                ("Y".into(), 1),
                ("C".into(), 1),
            ]
        );
    }

    #[test]
    fn noop_drags_return_none() {
        let widgets = vec![widget("A", 0, true), widget("B", 1, true), widget("Z", 2, false)];
        assert!(reorder_widgets(&widgets, "A", Some("A")).is_none());
        assert!(reorder_widgets(&widgets, "A", None).is_none());
        assert!(reorder_widgets(&widgets, "Z", Some("A")).is_none());
        assert!(reorder_widgets(&widgets, "A", Some("missing")).is_none());
    }

    #[test]
    fn set_enabled_keeps_everything_else() {
        let widgets = vec![widget("A", 5, true).with_props(json!({ "limit": 3 }))];
        let off = set_enabled(&widgets, "A", false);
        assert!(!off[0].enabled);
        assert_eq!(off[0].position, 5);
        assert_eq!(off[0].props, json!({ "limit": 3 }));
    }

    #[test]
    fn toggled_span_flips_between_presets() {
        assert_eq!(toggled_span(WidgetSpan::SMALL), WidgetSpan::LARGE);
        assert_eq!(toggled_span(WidgetSpan::LARGE), WidgetSpan::SMALL);
        assert_eq!(toggled_span(WidgetSpan::new(2, 1)), WidgetSpan::SMALL);
    }

    #[test]
    fn columns_follow_breakpoints() {
        assert_eq!(column_count(300.0), 1);
        assert_eq!(column_count(600.0), 2);
        assert_eq!(column_count(1200.0), 3);
    }

    #[test]
    fn placement_first_fit() {
        let spans = [
            WidgetSpan::new(2, 2),
            WidgetSpan::new(1, 1),
            WidgetSpan::new(1, 1),
            WidgetSpan::new(3, 1),
        ];
        let (placements, rows) = place_widgets(&spans, 3);
        assert_eq!((placements[0].row, placements[0].col), (0, 0));
        assert_eq!((placements[1].row, placements[1].col), (0, 2));
        assert_eq!((placements[2].row, placements[2].col), (1, 2));
        assert_eq!((placements[3].row, placements[3].col), (2, 0));
        assert_eq!(rows, 3);
    }

    #[test]
    fn placement_clamps_to_single_column() {
        let (placements, rows) = place_widgets(&[WidgetSpan::LARGE, WidgetSpan::SMALL], 1);
        assert_eq!(placements[0].col_span, 1);
        assert_eq!(placements[1].row, 2);
        assert_eq!(rows, 3);
    }

    #[test]
    fn effective_props_overlays_compact() {
        let props = json!({ "limit": 4, "compact": false });
        assert_eq!(
            effective_props(&props, true),
            json!({ "limit": 4, "compact": true })
        );
        assert_eq!(props, json!({ "limit": 4, "compact": false }));
        assert_eq!(effective_props(&Value::Null, false), json!({ "compact": false }));
    }
}
