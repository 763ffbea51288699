use evosnake_engine::{Game, Snake};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// Round counter and one line of statistics per snake.
pub struct SnakeStatsDisplay<'a> {
    game: &'a Game,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SnakeStatsDisplay<'a> {
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
        36 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let rows = u16::try_from(self.game.snakes().len() + 2).unwrap_or(u16::MAX);
        rows.saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    fn snake_line(index: usize, snake: &Snake) -> Line<'static> {
        let stats = snake.stats();
        let label_style = if snake.is_alive() {
            Style::new().fg(style::snake_color(index))
        } else {
            style::DEAD
        };
        Line::from(vec![
            Span::styled(format!("#{index:<2}"), label_style),
            Span::styled(
                format!(
                    " len {:>3}  food {:>3}  deaths {:>2}",
                    snake.len(),
                    stats.food_eaten(),
                    stats.deaths()
                ),
                style::DEFAULT,
            ),
        ])
    }
}

impl Widget for SnakeStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let mut lines = vec![
            Line::styled(format!("ROUND: {}", self.game.round()), style::DEFAULT),
            Line::default(),
        ];
        lines.extend(
            self.game
                .snakes()
                .iter()
                .enumerate()
                .map(|(i, snake)| Self::snake_line(i, snake)),
        );

        for (y, line) in (area.top()..area.bottom()).zip(lines) {
            line.render(Rect::new(area.x, y, area.width, 1), buf);
        }
    }
}
