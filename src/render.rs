use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::game::Game;
use crate::grid::Pos;

const CELL_W: usize = 2;
const CONTROLS: &str = "arrows/hjkl/wasd move  n new maze  1-3 difficulty  q quit";
const WIN_BANNER: &str = "  ★ You made it! ★  ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Glyph {
    Player,
    Wall,
    Empty,
    Start,
    End,
    Visited,
    Hint,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tile {
    glyph: Glyph,
    color: Color,
}

const BLANK: Tile = Tile {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

/// Redraws only the board cells and status lines that changed since the last frame.
pub struct Renderer {
    last: Vec<Tile>,
    last_size: usize,
    last_hud: String,
    last_status: String,
    last_won: bool,
    needs_full: bool,
    term_w: u16,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(size: usize) -> Self {
        Self {
            last: vec![BLANK; size * size],
            last_size: size,
            last_hud: String::new(),
            last_status: String::new(),
            last_won: false,
            needs_full: true,
            term_w: 0,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn render<W: Write>(&mut self, out: &mut W, game: &Game) -> io::Result<()> {
        let (term_w, term_h) = terminal::size()?;
        self.render_sized(out, game, term_w, term_h)
    }

    fn render_sized<W: Write>(
        &mut self,
        out: &mut W,
        game: &Game,
        term_w: u16,
        term_h: u16,
    ) -> io::Result<()> {
        let size = game.grid().size();
        if size != self.last_size {
            *self = Renderer::new(size);
        }

        let needed_h = (size + 3) as u16;
        let needed_w = ((size * CELL_W) as u16).max(CONTROLS.len() as u16);

        out.queue(MoveTo(0, 0))?;

        self.term_w = term_w;
        if term_w < needed_w || term_h < needed_h {
            out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let board_w = (size * CELL_W) as u16;
        let origin_x = (term_w - board_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        // banner sits on top of board tiles
        if game.won() != self.last_won {
            self.last_won = game.won();
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        let hud = hud_line(game);
        if self.needs_full || hud != self.last_hud {
            self.draw_line(out, self.origin_y - 1, &hud, Color::White)?;
            self.last_hud = hud;
        }

        for row in 0..size {
            for col in 0..size {
                let pos = Pos::new(row, col);
                let tile = tile_for(game, pos);
                let idx = row * size + col;
                if self.needs_full || tile != self.last[idx] {
                    self.last[idx] = tile;
                    self.draw_tile(out, pos, tile)?;
                }
            }
        }

        let status = game.message().unwrap_or("").to_string();
        if self.needs_full || status != self.last_status {
            let color = if game.won() { Color::Green } else { Color::Yellow };
            self.draw_line(out, self.origin_y + size as u16, &status, color)?;
            self.last_status = status;
        }
        if self.needs_full {
            self.draw_line(out, self.origin_y + size as u16 + 1, CONTROLS, Color::DarkGrey)?;
            if game.won() {
                self.draw_banner(out, self.origin_y + (size / 2) as u16)?;
            }
        }
        self.needs_full = false;

        out.flush()
    }

    fn draw_line<W: Write>(&self, out: &mut W, y: u16, text: &str, color: Color) -> io::Result<()> {
        out.queue(MoveTo(0, y))?;
        out.queue(Clear(ClearType::CurrentLine))?;
        let w = UnicodeWidthStr::width(text) as u16;
        let x = self.term_w.saturating_sub(w) / 2;
        out.queue(MoveTo(x, y))?;
        out.queue(SetForegroundColor(color))?;
        out.queue(Print(text))?;
        out.queue(ResetColor)?;
        Ok(())
    }

    fn draw_banner<W: Write>(&self, out: &mut W, y: u16) -> io::Result<()> {
        let w = UnicodeWidthStr::width(WIN_BANNER) as u16;
        let x = self.term_w.saturating_sub(w) / 2;
        out.queue(MoveTo(x, y))?;
        out.queue(SetBackgroundColor(Color::DarkGreen))?;
        out.queue(SetForegroundColor(Color::White))?;
        out.queue(Print(WIN_BANNER))?;
        out.queue(ResetColor)?;
        Ok(())
    }

    fn draw_tile<W: Write>(&self, out: &mut W, pos: Pos, tile: Tile) -> io::Result<()> {
        let text = match tile.glyph {
            Glyph::Player => "😃",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::Start => "S ",
            Glyph::End => "🏁",
            Glyph::Visited => "· ",
            Glyph::Hint => "◆ ",
        };
        let x = self.origin_x + (pos.col * CELL_W) as u16;
        let y = self.origin_y + pos.row as u16;
        out.queue(MoveTo(x, y))?;
        out.queue(SetForegroundColor(tile.color))?;
        out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        for _ in w..CELL_W {
            out.queue(Print(' '))?;
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

fn hud_line(game: &Game) -> String {
    format!(
        "Difficulty: {}  Moves: {}  Solved: {}",
        game.difficulty(),
        game.moves(),
        game.solved()
    )
}

fn tile_for(game: &Game, pos: Pos) -> Tile {
    if pos == game.player() {
        return Tile {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    let cell = game.grid().cell(pos);
    if cell.is_wall {
        Tile {
            glyph: Glyph::Wall,
            color: Color::Blue,
        }
    } else if cell.is_end {
        Tile {
            glyph: Glyph::End,
            color: Color::Green,
        }
    } else if cell.is_start {
        Tile {
            glyph: Glyph::Start,
            color: Color::Cyan,
        }
    } else if cell.hint {
        Tile {
            glyph: Glyph::Hint,
            color: Color::Magenta,
        }
    } else if cell.visited {
        Tile {
            glyph: Glyph::Visited,
            color: Color::White,
        }
    } else {
        BLANK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::grid::{Dir, Grid};
    use rand::SeedableRng;
    use rand_isaac::Isaac64Rng;

    #[test]
    fn tiles_follow_cell_flags() {
        let grid = Grid::from_strs(&[".#.", "...", "..."]).unwrap();
        let mut game = Game::with_grid(&Settings::default(), grid);

        assert_eq!(tile_for(&game, Pos::new(0, 0)).glyph, Glyph::Player);
        assert_eq!(tile_for(&game, Pos::new(0, 1)).glyph, Glyph::Wall);
        assert_eq!(tile_for(&game, Pos::new(2, 2)).glyph, Glyph::End);
        assert_eq!(tile_for(&game, Pos::new(1, 1)), BLANK);

        game.try_move(Dir::Down);
        assert_eq!(tile_for(&game, Pos::new(0, 0)).glyph, Glyph::Start);
        assert_eq!(tile_for(&game, Pos::new(1, 0)).glyph, Glyph::Player);
        game.try_move(Dir::Right);
        assert_eq!(tile_for(&game, Pos::new(1, 0)).glyph, Glyph::Visited);
    }

    #[test]
    fn glyphs_fit_the_cell_width() {
        for text in ["😃", "██", "  ", "S ", "🏁", "· ", "◆ "] {
            assert!(UnicodeWidthStr::width(text) <= CELL_W, "{:?}", text);
        }
    }

    fn frame(renderer: &mut Renderer, game: &Game) -> String {
        let mut out = Vec::new();
        renderer.render_sized(&mut out, game, 80, 24).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn win_banner_shows_only_while_won() {
        let mut rng = Isaac64Rng::seed_from_u64(1);
        let mut game = Game::with_grid(&Settings::default(), Grid::open(2));
        let mut renderer = Renderer::new(2);
        assert!(!frame(&mut renderer, &game).contains(WIN_BANNER));

        game.try_move(Dir::Down);
        game.try_move(Dir::Right);
        assert!(game.won());
        assert!(frame(&mut renderer, &game).contains(WIN_BANNER));
        // nothing changed, so nothing is redrawn
        assert!(!frame(&mut renderer, &game).contains(WIN_BANNER));

        game.update(Settings::default().win_delay(), &mut rng);
        assert!(!game.won());
        let next = frame(&mut renderer, &game);
        assert!(!next.contains(WIN_BANNER));
        assert!(next.contains(CONTROLS));
    }

    #[test]
    fn small_terminal_gets_a_notice() {
        let game = Game::with_grid(&Settings::default(), Grid::open(6));
        let mut renderer = Renderer::new(6);
        let mut out = Vec::new();
        renderer.render_sized(&mut out, &game, 20, 5).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Terminal too small"));
    }

    #[test]
    fn hud_reports_progress() {
        let game = Game::with_grid(&Settings::default(), Grid::open(3));
        assert_eq!(hud_line(&game), "Difficulty: Easy  Moves: 0  Solved: 0");
    }
}
