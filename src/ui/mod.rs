use iced::{
    widget::{button, center, column, container, opaque, stack, text, Column, Space},
    Color, Element, Length,
};

use crate::domain::DownloadSession;
use crate::utils::fragment_lines;

pub const MODAL_TITLE: &str = "IGRAC Download";
pub const ERROR_BANNER: &str = "Data cannot be fetched";

/// Main page state
#[derive(Debug, Clone)]
pub struct PageView {
    pub status_message: String,
    pub resource_id: Option<String>,
    pub view_params: Option<String>,
    pub layers_cached: usize,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            status_message: "Preparing map context...".to_string(),
            resource_id: None,
            view_params: None,
            layers_cached: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum UiMessage {
    DownloadPressed,
    CloseModal,
}

impl PageView {
    pub fn view<'a>(&'a self, session: &'a DownloadSession) -> Element<'a, UiMessage> {
        let page = self.page(session);
        if session.enabled {
            modal(page, download_modal(session, self.resource_id.as_deref()))
        } else {
            page
        }
    }

    fn page<'a>(&'a self, session: &DownloadSession) -> Element<'a, UiMessage> {
        let resource = match &self.resource_id {
            Some(id) => format!("Map: {}", id),
            None => "Map: (none)".to_string(),
        };
        let scope = match &self.view_params {
            Some(view_params) => format!("View params: {}", view_params),
            None => "View params: (not set)".to_string(),
        };

        let download = button(if session.is_downloading {
            "Requesting download..."
        } else {
            "Download data"
        })
        .padding([10, 20]);
        let download = if session.is_downloading {
            download
        } else {
            download.on_press(UiMessage::DownloadPressed)
        };

        column![
            text("Groundwater Map").size(32),
            Space::new().height(Length::Fixed(20.0)),
            text(resource).size(16),
            text(scope).size(14),
            text(format!("Layer schemas loaded: {}", self.layers_cached)).size(14),
            Space::new().height(Length::Fixed(10.0)),
            text(&self.status_message).size(14),
            Space::new().height(Length::Fixed(20.0)),
            download,
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}

/// Body of the download dialog for `session`.
fn download_modal<'a>(
    session: &'a DownloadSession,
    resource_id: Option<&'a str>,
) -> Element<'a, UiMessage> {
    let mut body = Column::new().spacing(10);

    body = body.push(text(MODAL_TITLE).size(20));
    if let Some(id) = resource_id {
        body = body.push(text(format!("Map {}", id)).size(12));
    }

    if session.has_error() {
        body = body.push(
            container(text(ERROR_BANNER).color(Color::WHITE))
                .padding(10)
                .width(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Color::from_rgb(0.8, 0.2, 0.2).into()),
                    ..container::Style::default()
                }),
        );
    }

    if !session.data.is_empty() {
        body = body.push(Column::with_children(
            fragment_lines(&session.data)
                .into_iter()
                .map(|line| -> Element<'a, UiMessage> { text(line).size(14).into() }),
        ));
    }

    body = body.push(button("Close").on_press(UiMessage::CloseModal));

    container(body)
        .width(Length::Fixed(420.0))
        .padding(20)
        .style(container::rounded_box)
        .into()
}

/// Layer `content` over `base`. Clicks outside the dialog do nothing.
fn modal<'a>(
    base: Element<'a, UiMessage>,
    content: Element<'a, UiMessage>,
) -> Element<'a, UiMessage> {
    stack![
        base,
        opaque(center(opaque(content)).style(|_theme| container::Style {
            background: Some(
                Color {
                    a: 0.8,
                    ..Color::WHITE
                }
                .into()
            ),
            ..container::Style::default()
        }))
    ]
    .into()
}
