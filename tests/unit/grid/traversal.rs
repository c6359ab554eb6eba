use super::*;

#[test]
fn snake_order_on_a_four_wide_board() {
    assert_eq!(
        (0..4).map(|c| snake_step(c, 0, 4)).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    assert_eq!(
        [3, 2, 1, 0].iter().map(|&c| snake_step(c, 1, 4)).collect::<Vec<_>>(),
        vec![4, 5, 6, 7]
    );
    assert_eq!(snake_step(0, 2, 4), 8);
    assert_eq!(snake_step(0, 3, 4), 15);
    assert_eq!(snake_cell(7, 4), Some((0, 1)));
    assert_eq!(snake_cell(16, 4), None);
}

#[test]
fn step_index_is_a_bijection_for_supported_sizes() {
    for grid in GridSize::ALL {
        let side = grid.side();
        let total = grid.cell_count() as usize;
        let mut seen = vec![false; total];
        for row in 0..side {
            for column in 0..side {
                let s = step_index(column, row, grid) as usize;
                assert!(s < total);
                assert!(!seen[s], "step {s} hit twice on {grid}");
                seen[s] = true;
                assert_eq!(cell_at_step(s as u32, grid), Some((column, row)));
            }
        }
        assert!(seen.iter().all(|&v| v));
        assert_eq!(cell_at_step(grid.cell_count(), grid), None);
    }
}

#[test]
fn consecutive_steps_are_neighbours() {
    let mut path = SnakePath::new(GridSize::Fifty);
    assert_eq!(path.len(), 2500);
    let mut prev = path.next().unwrap();
    assert_eq!(prev, (0, 0));
    for cur in path {
        let dc = prev.0.abs_diff(cur.0);
        let dr = prev.1.abs_diff(cur.1);
        assert_eq!(dc + dr, 1, "{prev:?} -> {cur:?}");
        prev = cur;
    }
    assert_eq!(prev, (0, 49));
}

#[test]
fn visibility_and_head_follow_progress() {
    let g = GridSize::Fifty;
    assert!(!is_visible(0, 0, 0, g));
    assert!(!is_head(0, 0, 0, g));

    assert!(is_visible(0, 0, 1, g));
    assert!(is_head(0, 0, 1, g));
    assert!(!is_visible(1, 0, 1, g));

    // Step 50 is the right-most socket of row 1.
    assert!(is_head(49, 1, 51, g));
    assert!(is_visible(49, 1, 51, g));
    assert!(!is_visible(48, 1, 51, g));

    let full = g.cell_count();
    assert!(is_visible(0, 49, full, g));
    assert!(!is_head(0, 49, full, g));
}
