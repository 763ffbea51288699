use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub type KeyBinding = (&'static [&'static str], &'static str);

const STEER_BINDING: KeyBinding = (&["←↑↓→", "WASD"], "Steer");
const QUIT_BINDING: KeyBinding = (&["q", "Esc"], "Quit");

#[derive(Debug)]
pub struct KeyBindingDisplay {
    bindings: Vec<KeyBinding>,
}

impl KeyBindingDisplay {
    pub const HEIGHT: u16 = 1;

    /// Bindings of the play screen; steering is listed only with a human player.
    pub fn for_play(human: bool) -> Self {
        let bindings = if human {
            vec![STEER_BINDING, QUIT_BINDING]
        } else {
            vec![QUIT_BINDING]
        };
        Self { bindings }
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const KEY_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const ITEM_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Widget for KeyBindingDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut spans = vec![];
        for (i, (keys, desc)) in self.bindings.iter().copied().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", ITEM_SEPARATOR_STYLE));
            }
            let keys = keys.iter().map(|key| Span::styled(*key, KEY_STYLE));
            for (j, key) in keys.enumerate() {
                if j > 0 {
                    spans.push(Span::styled("/", KEY_SEPARATOR_STYLE));
                }
                spans.push(key);
            }
            spans.push(Span::from(" "));
            spans.push(Span::styled(desc, DESCRIPTION_STYLE));
        }

        Line::from(spans).centered().render(area, buf);
    }
}
