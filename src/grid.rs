#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// `(d_row, d_col)` for a single orthogonal step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

/// Moves `pos` one step in `dir`, or `None` if that leaves a `size`x`size` board.
pub fn step(pos: Pos, dir: Dir, size: usize) -> Option<Pos> {
    let (dr, dc) = dir.delta();
    let nr = pos.row as isize + dr;
    let nc = pos.col as isize + dc;
    if nr < 0 || nc < 0 {
        return None;
    }
    let (nr, nc) = (nr as usize, nc as usize);
    if nr >= size || nc >= size {
        return None;
    }
    Some(Pos::new(nr, nc))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub is_wall: bool,
    pub is_start: bool,
    pub is_end: bool,
    pub visited: bool,
    pub hint: bool,
}

impl Cell {
    fn open(row: usize, col: usize, size: usize) -> Self {
        Self {
            row,
            col,
            is_wall: false,
            is_start: row == 0 && col == 0,
            is_end: row + 1 == size && col + 1 == size,
            visited: false,
            hint: false,
        }
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.row, self.col)
    }
}

/// Square board of cells. The start is always (0,0) and the end (N-1,N-1);
/// neither is ever a wall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// A board with no walls at all.
    pub fn open(size: usize) -> Self {
        let size = size.max(1);
        let cells = (0..size)
            .map(|row| (0..size).map(|col| Cell::open(row, col, size)).collect())
            .collect();
        Self { size, cells }
    }

    /// Builds a board from rows of `#` (wall) and `.` (open).
    pub fn from_strs(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        if size == 0 {
            return None;
        }
        let mut grid = Self::open(size);
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != size {
                return None;
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = grid.cells[row][col];
                match ch {
                    '.' => {}
                    '#' if cell.is_start || cell.is_end => return None,
                    '#' => grid.set_wall(cell.pos(), true),
                    _ => return None,
                }
            }
        }
        Some(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Pos {
        Pos::new(0, 0)
    }

    pub fn end(&self) -> Pos {
        Pos::new(self.size - 1, self.size - 1)
    }

    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[pos.row][pos.col]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flat_map(|row| row.iter())
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.contains(pos) && !self.cell(pos).is_wall
    }

    /// Start and end refuse to become walls.
    pub fn set_wall(&mut self, pos: Pos, wall: bool) {
        let cell = &mut self.cells[pos.row][pos.col];
        if cell.is_start || cell.is_end {
            return;
        }
        cell.is_wall = wall;
    }

    pub fn wall_count(&self) -> usize {
        self.cells().filter(|c| c.is_wall).count()
    }

    pub fn mark_visited(&mut self, pos: Pos) {
        self.cells[pos.row][pos.col].visited = true;
    }

    pub fn clear_marks(&mut self) {
        for cell in self.cells.iter_mut().flat_map(|row| row.iter_mut()) {
            cell.visited = false;
            cell.hint = false;
        }
    }

    pub fn mark_hint_path(&mut self, path: &[Pos]) {
        for &pos in path {
            let cell = &mut self.cells[pos.row][pos.col];
            if cell.is_start || cell.is_end {
                continue;
            }
            cell.hint = true;
        }
    }

    pub fn hint_cells(&self) -> Vec<Pos> {
        self.cells().filter(|c| c.hint).map(Cell::pos).collect()
    }

    pub fn has_hint(&self) -> bool {
        self.cells().any(|c| c.hint)
    }
}
