use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{board_display::*, key_binding_display::*, snake_stats_display::*};

mod board_display;
mod key_binding_display;
mod snake_stats_display;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(63, 63, 63);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const BLOCK: Style = bg_only(color::GRAY);
    pub const FOOD: Style = fg_bg(color::RED, color::BLACK).add_modifier(Modifier::BOLD);
    pub const DEAD: Style = fg_bg(color::GRAY, color::BLACK).add_modifier(Modifier::CROSSED_OUT);

    const SNAKE_COLORS: [Color; 6] = [
        color::GREEN,
        color::CYAN,
        color::YELLOW,
        color::MAGENTA,
        color::ORANGE,
        color::BLUE,
    ];

    /// Color identifying the snake in slot `index`.
    pub const fn snake_color(index: usize) -> Color {
        SNAKE_COLORS[index % SNAKE_COLORS.len()]
    }

    pub const fn snake_body(index: usize) -> Style {
        bg_only(snake_color(index))
    }

    pub const fn snake_head(index: usize) -> Style {
        fg_bg(color::BLACK, snake_color(index)).add_modifier(Modifier::BOLD)
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
