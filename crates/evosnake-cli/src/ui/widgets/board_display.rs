use evosnake_engine::{Cell, Game, Position};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::style;

/// Terminal columns per board cell; two keep cells roughly square.
const CELL_WIDTH: u16 = 2;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    game: &'a Game,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self { game, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        let cells = u16::try_from(self.game.board().width()).unwrap_or(u16::MAX);
        cells.saturating_mul(CELL_WIDTH) + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let cells = u16::try_from(self.game.board().height()).unwrap_or(u16::MAX);
        cells.saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    fn cell_appearance(&self, pos: Position, cell: Cell) -> (&'static str, Style) {
        match cell {
            Cell::Empty => (" ·", style::EMPTY_DOT),
            Cell::Food(_) => ("<>", style::FOOD),
            Cell::Block => ("  ", style::BLOCK),
            Cell::Body(id) => {
                let is_head = self
                    .game
                    .snakes()
                    .get(id.index())
                    .and_then(|snake| snake.head())
                    == Some(pos);
                if is_head {
                    ("@@", style::snake_head(id.index()))
                } else {
                    ("  ", style::snake_body(id.index()))
                }
            }
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        buf.set_style(area, style::DEFAULT);

        let board = self.game.board();
        for pos in board.positions() {
            let (Ok(x), Ok(y)) = (u16::try_from(pos.x), u16::try_from(pos.y)) else {
                continue;
            };
            let Some(x) = x.checked_mul(CELL_WIDTH) else {
                continue;
            };
            if x + CELL_WIDTH > area.width || y >= area.height {
                continue;
            }
            let Some(cell) = board.get(pos) else {
                continue;
            };
            let (text, style) = self.cell_appearance(pos, cell);
            buf.set_string(area.x + x, area.y + y, text, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use evosnake_engine::{Direction, GameConfig, GameSeed};

    use super::*;

    #[test]
    fn test_renders_snake_food_and_blocks() {
        let config = GameConfig {
            width: 6,
            height: 4,
            num_snakes: 0,
            num_foods: 0,
            ..GameConfig::default()
        };
        let mut game = Game::empty(&config, GameSeed::from_u64(0)).unwrap();
        game.place_snake(&[Position::new(2, 1), Position::new(1, 1)], Direction::Right)
            .unwrap();
        game.place_food(Position::new(4, 1)).unwrap();
        game.place_block(Position::new(0, 3)).unwrap();

        let display = BoardDisplay::new(&game);
        assert_eq!((display.width(), display.height()), (12, 4));
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        assert_eq!(buf[(4, 1)].symbol(), "@");
        assert_eq!(Some(buf[(2, 1)].bg), style::snake_body(0).bg);
        assert_eq!(buf[(8, 1)].symbol(), "<");
        assert_eq!(Some(buf[(0, 3)].bg), style::BLOCK.bg);
        assert_eq!(buf[(1, 0)].symbol(), "·");
    }
}
