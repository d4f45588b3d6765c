use std::collections::HashSet;

use crate::grid::{step, Dir, Grid, Pos};

/// Ordered coordinates from start to end, inclusive.
pub type Path = Vec<Pos>;

// Changing this order changes which path gets hinted, never whether one is found.
const SEARCH_ORDER: [Dir; 4] = [Dir::Down, Dir::Up, Dir::Right, Dir::Left];

/// Depth-first search from the start cell to the end cell.
///
/// Returns the first path found, not necessarily the shortest. `None` means
/// the grid is unsolvable, which is an ordinary outcome for the generator.
pub fn solve(grid: &Grid) -> Option<Path> {
    let start = grid.start();
    let end = grid.end();
    let size = grid.size();

    let mut visited = HashSet::new();
    let mut stack: Vec<(Pos, Path)> = vec![(start, vec![start])];

    while let Some((pos, path)) = stack.pop() {
        if pos == end {
            return Some(path);
        }
        if !visited.insert(pos) {
            continue;
        }
        for dir in SEARCH_ORDER {
            let next = match step(pos, dir, size) {
                Some(next) => next,
                None => continue,
            };
            if grid.cell(next).is_wall || visited.contains(&next) {
                continue;
            }
            let mut next_path = path.clone();
            next_path.push(next);
            stack.push((next, next_path));
        }
    }
    None
}

/// True when `path` runs from start to end in orthogonal unit steps over open cells.
pub fn is_valid_path(grid: &Grid, path: &[Pos]) -> bool {
    match (path.first(), path.last()) {
        (Some(&first), Some(&last)) if first == grid.start() && last == grid.end() => {}
        _ => return false,
    }
    if path.iter().any(|&p| !grid.is_open(p)) {
        return false;
    }
    path.windows(2).all(|w| {
        let dr = w[0].row.abs_diff(w[1].row);
        let dc = w[0].col.abs_diff(w[1].col);
        dr + dc == 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell_grid_has_trivial_path() {
        let grid = Grid::open(1);
        assert_eq!(solve(&grid), Some(vec![Pos::new(0, 0)]));
    }

    #[test]
    fn open_grid_is_solvable() {
        let grid = Grid::open(3);
        let path = solve(&grid).unwrap();
        assert!(is_valid_path(&grid, &path));
        assert_eq!(path.first(), Some(&Pos::new(0, 0)));
        assert_eq!(path.last(), Some(&Pos::new(2, 2)));
    }

    #[test]
    fn walled_off_end_is_unsolvable() {
        let grid = Grid::from_strs(&["...", "..#", ".#."]).unwrap();
        assert_eq!(solve(&grid), None);
    }

    #[test]
    fn follows_the_only_corridor() {
        let grid = Grid::from_strs(&[
            ".####", //
            ".#...",
            ".#.#.",
            "...#.",
            "####.",
        ])
        .unwrap();
        let path = solve(&grid).unwrap();
        assert!(is_valid_path(&grid, &path));
        assert_eq!(
            path,
            vec![
                Pos::new(0, 0),
                Pos::new(1, 0),
                Pos::new(2, 0),
                Pos::new(3, 0),
                Pos::new(3, 1),
                Pos::new(3, 2),
                Pos::new(2, 2),
                Pos::new(1, 2),
                Pos::new(1, 3),
                Pos::new(1, 4),
                Pos::new(2, 4),
                Pos::new(3, 4),
                Pos::new(4, 4),
            ]
        );
    }

    #[test]
    fn solving_twice_gives_the_same_path() {
        let grid = Grid::from_strs(&["....", ".#..", "..#.", "#..."]).unwrap();
        let a = solve(&grid).unwrap();
        let b = solve(&grid).unwrap();
        assert_eq!(a, b);
        assert!(is_valid_path(&grid, &a));
    }

    #[test]
    fn rejects_broken_paths() {
        let grid = Grid::from_strs(&["..", "#."]).unwrap();
        let good = vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(1, 1)];
        assert!(is_valid_path(&grid, &good));

        let diagonal = vec![Pos::new(0, 0), Pos::new(1, 1)];
        assert!(!is_valid_path(&grid, &diagonal));

        let through_wall = vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(1, 1)];
        assert!(!is_valid_path(&grid, &through_wall));

        let short = vec![Pos::new(0, 0), Pos::new(0, 1)];
        assert!(!is_valid_path(&grid, &short));
        assert!(!is_valid_path(&grid, &[]));
    }
}
