use iced::widget::{
    button, canvas, checkbox, column, container, horizontal_space, pick_list, row, scrollable,
    slider, text, text_input, Column, Row,
};
use iced::{Alignment, Element, Length, Task, Theme};
use iced_aw::Wrap;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use tracing_subscriber::EnvFilter;

mod config;
mod location;
mod map;
mod media;
mod state;
mod ui;

use config::{Config, SessionLocation};
use location::LocationError;
use map::projection::Coordinate;
use media::{AttachedFile, IMAGE_EXTENSIONS, LAYER_EXTENSIONS};
use state::app::AppState;
use state::data::{ImageHandle, LayerId, SignId, SignInstance, SignStatus};
use state::session::{BlobStore, MemorySession, SqliteSession};
use state::view::{SignTypeChoice, Tab, ViewState};
use ui::map::{marker_title, SiteMap};
use ui::style;

const TITLE: &str = "Mine Site Sign Tracker";

/// Main application state
struct SignTracker {
    /// The persisted stores
    app: AppState,
    /// Tabs, forms and selection
    view: ViewState,
    config: Config,
    /// Status line shown under the tabs
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    TabSelected(Tab),

    SignTypeNameChanged(String),
    SignTypeDescriptionChanged(String),
    PickSignTypeImage,
    SignTypeImageReady(ImageHandle),
    SubmitSignType,

    PlacementTypeSelected(SignTypeChoice),
    PlacementLatChanged(String),
    PlacementLngChanged(String),
    PlacedByChanged(String),
    RequestLocation,
    LocationResolved(Result<Coordinate, LocationError>),
    SubmitPlacement,

    SignSelected(SignId),
    CloseDetails,
    StatusChanged(SignId, SignStatus),

    LayerNameChanged(String),
    PickLayerFile,
    SubmitLayer,
    LayerToggled(LayerId),
    LayerOpacityChanged(LayerId, f32),
}

impl SignTracker {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::from_env();
        let app = AppState::init(open_session(&config.session));

        let status = format!(
            "Ready. {} signs across {} sign types.",
            app.instances().len(),
            app.catalog().len()
        );

        (
            SignTracker { app, view: ViewState::default(), config, status },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.view.active_tab = tab;
            }

            Message::SignTypeNameChanged(name) => self.view.sign_type_form.name = name,
            Message::SignTypeDescriptionChanged(description) => {
                self.view.sign_type_form.description = description;
            }
            Message::PickSignTypeImage => {
                let picked = FileDialog::new()
                    .set_title("Select Sign Image")
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .pick_file();

                if let Some(path) = picked {
                    self.status = format!("Preparing image {}...", path.display());
                    return Task::perform(
                        media::cache_preview(path, self.config.media_dir.clone()),
                        Message::SignTypeImageReady,
                    );
                }
            }
            Message::SignTypeImageReady(handle) => {
                self.status = "Image attached.".to_string();
                self.view.sign_type_form.image = Some(handle);
            }
            Message::SubmitSignType => match self.view.submit_sign_type(&mut self.app) {
                Ok(added) => {
                    self.status = format!("Sign type \"{}\" added.", added.name);
                    alert(MessageLevel::Info, "Sign type added!");
                }
                Err(e) => alert(MessageLevel::Warning, &e.to_string()),
            },

            Message::PlacementTypeSelected(choice) => {
                self.view.placement_form.sign_type_id = Some(choice.id);
            }
            Message::PlacementLatChanged(lat) => self.view.placement_form.lat = lat,
            Message::PlacementLngChanged(lng) => self.view.placement_form.lng = lng,
            Message::PlacedByChanged(name) => self.view.placement_form.placed_by = name,
            Message::RequestLocation => {
                self.status = "Requesting current location...".to_string();
                return Task::perform(
                    location::request_location(self.config.device_location),
                    Message::LocationResolved,
                );
            }
            Message::LocationResolved(Ok(coord)) => {
                self.view.apply_location(coord);
                self.status = format!("Current location: {:.6}, {:.6}", coord.lat, coord.lng);
            }
            Message::LocationResolved(Err(e)) => {
                tracing::warn!(error = %e, "location request failed");
                self.status = "Location unavailable.".to_string();
                alert(MessageLevel::Warning, &e.to_string());
            }
            Message::SubmitPlacement => match self.view.submit_placement(&mut self.app) {
                Ok(placed) => {
                    self.status = format!(
                        "Sign #{} placed at {:.6}, {:.6}.",
                        placed.id, placed.lat, placed.lng
                    );
                    alert(MessageLevel::Info, "Sign added!");
                }
                Err(e) => alert(MessageLevel::Warning, &e.to_string()),
            },

            Message::SignSelected(id) => self.view.select(id),
            Message::CloseDetails => self.view.clear_selection(),
            Message::StatusChanged(id, status) => self.app.update_sign_status(id, status),

            Message::LayerNameChanged(name) => self.view.layer_form.name = name,
            Message::PickLayerFile => {
                let picked = FileDialog::new()
                    .set_title("Select TIF/GeoTIFF File")
                    .add_filter("TIF/GeoTIFF", &LAYER_EXTENSIONS)
                    .pick_file();

                if let Some(path) = picked {
                    match AttachedFile::from_path(&path) {
                        Ok(file) => self.view.layer_form.file = Some(file),
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "could not attach layer file");
                            alert(MessageLevel::Error, &e.to_string());
                        }
                    }
                }
            }
            Message::SubmitLayer => match self.view.submit_layer(&mut self.app) {
                Ok(added) => {
                    self.status = format!("Imagery layer \"{}\" added.", added.name);
                    alert(
                        MessageLevel::Info,
                        "Imagery layer added successfully! Open the Map tab to see it.",
                    );
                }
                Err(e) => alert(MessageLevel::Warning, &e.to_string()),
            },
            Message::LayerToggled(id) => self.app.toggle_layer(id),
            Message::LayerOpacityChanged(id, opacity) => self.app.set_layer_opacity(id, opacity),
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = container(
            column![
                text(TITLE).size(24).color(iced::Color::WHITE),
                text("Location-based inventory of traffic and safety signs at the open-pit mine")
                    .size(14)
                    .color(iced::Color::WHITE),
            ]
            .spacing(4),
        )
        .padding(16)
        .width(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(style::ACCENT.into()),
            ..container::Style::default()
        });

        let tabs = Tab::ALL.iter().fold(Row::new().spacing(4), |tabs, &tab| {
            let tab_style: fn(&Theme, button::Status) -> button::Style = if tab == self.view.active_tab {
                button::primary
            } else {
                button::secondary
            };
            tabs.push(button(text(tab.label())).on_press(Message::TabSelected(tab)).style(tab_style))
        });

        let content = match self.view.active_tab {
            Tab::Map => self.map_view(),
            Tab::AddSign => self.add_sign_view(),
            Tab::SignTypes => self.sign_types_view(),
            Tab::Layers => self.layers_view(),
            Tab::List => self.list_view(),
        };

        column![
            header,
            container(tabs).padding([8, 16]),
            container(text(&self.status).size(13)).padding([0, 16]),
            scrollable(container(content).padding(16).width(Length::Fill)),
        ]
        .spacing(4)
        .into()
    }

    fn map_view(&self) -> Element<Message> {
        let site_map = SiteMap::new(
            self.config.site_bounds,
            self.app.instances().list(),
            self.app.layers().visible(),
            self.view.selected,
        );

        let legend = SignStatus::ALL.iter().fold(Row::new().spacing(16), |legend, &status| {
            legend.push(
                text(format!("● {} ({})", status, self.app.instances().count_by_status(status)))
                    .color(style::status_color(status)),
            )
        });

        Column::new()
            .spacing(12)
            .push(
                row![
                    text("Sign Map").size(20),
                    horizontal_space(),
                    text(format!("{} signs", self.app.instances().len())),
                ]
                .align_y(Alignment::Center),
            )
            .push(canvas(site_map).width(Length::Fill).height(Length::Fixed(420.0)))
            .push_maybe(self.view.selected_sign(&self.app).map(|sign| self.details_panel(sign)))
            .push(text("Sign Conditions").size(16))
            .push(legend)
            .into()
    }

    fn details_panel<'a>(&'a self, sign: &'a SignInstance) -> Element<'a, Message> {
        let id = sign.id;
        let panel = column![
            row![
                text("Sign Details").size(18),
                horizontal_space(),
                button("Close").on_press(Message::CloseDetails).style(button::text),
            ]
            .align_y(Alignment::Center),
            text(marker_title(self.app.catalog(), sign)).size(16),
            row![
                text("Status:"),
                text(sign.status.label()).color(style::status_color(sign.status)),
            ]
            .spacing(8),
            text(format!("Placed by: {}", sign.placed_by)),
            text(format!("Placed on: {}", sign.placed_date)),
            text(format!("Coordinates: {:.6}, {:.6}", sign.lat, sign.lng)),
            text("Update status"),
            pick_list(SignStatus::ALL, Some(sign.status), move |status| {
                Message::StatusChanged(id, status)
            }),
        ]
        .spacing(6);

        container(panel)
            .padding(12)
            .width(Length::Fill)
            .style(container::rounded_box)
            .into()
    }

    fn add_sign_view(&self) -> Element<Message> {
        let form = &self.view.placement_form;

        let submit = button("Add Sign").on_press(Message::SubmitPlacement).padding(10);

        Column::new()
            .spacing(10)
            .max_width(640)
            .push(text("Add New Sign").size(20))
            .push(text("Sign type"))
            .push_maybe(
                self.app
                    .catalog()
                    .is_empty()
                    .then(|| text("Add a sign type first in the Sign Types tab.").size(13)),
            )
            .push(
                pick_list(
                    ViewState::sign_type_choices(&self.app),
                    self.view.selected_choice(&self.app),
                    Message::PlacementTypeSelected,
                )
                .placeholder("Select a sign type")
                .width(Length::Fill),
            )
            .push(text("Coordinates"))
            .push(
                row![
                    text_input("Latitude (39.7600)", &form.lat).on_input(Message::PlacementLatChanged),
                    text_input("Longitude (29.1850)", &form.lng).on_input(Message::PlacementLngChanged),
                    button("Use current location").on_press(Message::RequestLocation),
                ]
                .spacing(8),
            )
            .push_maybe(self.view.user_location.map(|coord| {
                text(format!("✓ Current location acquired: {:.6}, {:.6}", coord.lat, coord.lng))
                    .size(13)
                    .color(style::GOOD)
            }))
            .push(text("Placed by"))
            .push(text_input("Enter your name", &form.placed_by).on_input(Message::PlacedByChanged))
            .push(submit)
            .into()
    }

    fn sign_types_view(&self) -> Element<Message> {
        let form = &self.view.sign_type_form;

        let image_row = row![
            button("Choose image").on_press(Message::PickSignTypeImage),
            text(match &form.image {
                Some(handle) => handle.as_str().to_string(),
                None => "No image selected".to_string(),
            })
            .size(13),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let form_panel = Column::new()
            .spacing(8)
            .max_width(640)
            .push(text("Add New Sign Type").size(16))
            .push(
                text_input("Sign name", &form.name)
                    .on_input(Message::SignTypeNameChanged),
            )
            .push(
                text_input("Description", &form.description)
                    .on_input(Message::SignTypeDescriptionChanged),
            )
            .push(image_row)
            .push_maybe(form.image.as_ref().map(|handle| sign_image(handle, 160.0)))
            .push(button("Add Sign Type").on_press(Message::SubmitSignType).padding(10));

        let cards: Vec<Element<Message>> = self
            .app
            .catalog()
            .list()
            .iter()
            .map(|sign_type| {
                let image: Element<Message> = match &sign_type.image {
                    Some(handle) => sign_image(handle, 180.0),
                    None => container(text("No image").size(12))
                        .width(Length::Fixed(180.0))
                        .height(Length::Fixed(120.0))
                        .center_x(Length::Fixed(180.0))
                        .center_y(Length::Fixed(120.0))
                        .style(container::rounded_box)
                        .into(),
                };

                let card = container(
                    column![
                        image,
                        text(&sign_type.name).size(16),
                        text(&sign_type.description).size(13),
                        text(format!("ID: {}", sign_type.id)).size(11),
                    ]
                    .spacing(4),
                )
                .padding(10)
                .width(Length::Fixed(204.0))
                .style(container::rounded_box);

                Element::from(card)
            })
            .collect();

        column![
            text("Sign Types").size(20),
            form_panel,
            text(format!("Sign types ({})", self.app.catalog().len())).size(16),
            Wrap::with_elements(cards).spacing(12.0_f32).line_spacing(12.0_f32),
        ]
        .spacing(14)
        .into()
    }

    fn layers_view(&self) -> Element<Message> {
        let form = &self.view.layer_form;

        let picked = match &form.file {
            Some(file) => format!("Selected: {} ({})", file.name, file.size_label()),
            None => "Choose a TIF/GeoTIFF file".to_string(),
        };

        let form_panel = column![
            text("Add New Imagery Layer").size(16),
            text_input("Layer name (e.g. Site Imagery - August 2024)", &form.name)
                .on_input(Message::LayerNameChanged),
            row![
                button("Choose file").on_press(Message::PickLayerFile),
                text(picked).size(13),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
            text("Supported formats: .tif, .tiff, .geotiff").size(12),
            button("Add Layer").on_press(Message::SubmitLayer).padding(10),
        ]
        .spacing(8)
        .max_width(640);

        let layers = self.app.layers().list().iter().fold(Column::new().spacing(10), |list, layer| {
            let id = layer.id;
            let details = layer
                .metadata
                .as_ref()
                .map(|m| format!("{} • {} • {}", m.filename, m.size, m.mime_type));

            list.push(
                container(
                    Column::new()
                        .spacing(6)
                        .push(
                            row![
                                column![
                                    text(&layer.name).size(16),
                                    text(format!("Uploaded: {}", layer.upload_date)).size(12),
                                ],
                                horizontal_space(),
                                checkbox("Visible", layer.visible)
                                    .on_toggle(move |_| Message::LayerToggled(id)),
                            ]
                            .align_y(Alignment::Center),
                        )
                        .push_maybe(details.map(|d| text(d).size(12)))
                        .push(text(format!("Opacity: {:.0}%", layer.opacity * 100.0)).size(13))
                        .push(
                            slider(0.0..=1.0, layer.opacity, move |value| {
                                Message::LayerOpacityChanged(id, value)
                            })
                            .step(0.1_f32),
                        ),
                )
                .padding(12)
                .width(Length::Fill)
                .style(container::rounded_box),
            )
        });

        column![
            text("Imagery Layers").size(20),
            form_panel,
            text("Current layers").size(16),
            layers,
        ]
        .spacing(14)
        .into()
    }

    fn list_view(&self) -> Element<Message> {
        let catalog = self.app.catalog();

        let rows = self.app.instances().list().iter().fold(Column::new().spacing(8), |list, sign| {
            let id = sign.id;
            list.push(
                container(
                    row![
                        column![
                            text(catalog.resolve_name(sign.sign_type_id)).size(16),
                            text(format!("{:.6}, {:.6}", sign.lat, sign.lng)).size(12),
                            text(format!("{} • {}", sign.placed_by, sign.placed_date)).size(12),
                        ]
                        .spacing(2),
                        horizontal_space(),
                        pick_list(SignStatus::ALL, Some(sign.status), move |status| {
                            Message::StatusChanged(id, status)
                        }),
                    ]
                    .align_y(Alignment::Center),
                )
                .padding(12)
                .width(Length::Fill)
                .style(container::rounded_box),
            )
        });

        let empty = self
            .app
            .instances()
            .is_empty()
            .then(|| text("No signs placed yet."));

        Column::new()
            .spacing(14)
            .push(text("Sign List").size(20))
            .push_maybe(empty)
            .push(rows)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Open the configured session store, falling back to memory if the
/// database cannot be opened
fn open_session(location: &SessionLocation) -> Box<dyn BlobStore> {
    match location {
        SessionLocation::Memory => Box::new(MemorySession::default()),
        SessionLocation::File(path) => match SqliteSession::open(path) {
            Ok(session) => {
                tracing::debug!(path = %session.path().display(), "using session database");
                Box::new(session)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "session database unavailable, keeping state in memory");
                Box::new(MemorySession::default())
            }
        },
    }
}

fn sign_image<'a>(handle: &ImageHandle, width: f32) -> Element<'a, Message> {
    let source = iced::widget::image::Handle::from_path(handle.as_str());

    iced::widget::Image::<iced::widget::image::Handle>::new(source)
        .width(Length::Fixed(width))
        .height(Length::Fixed(width * 2.0 / 3.0))
        .into()
}

/// Blocking message box, the desktop counterpart of a browser alert
fn alert(level: MessageLevel, description: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(TITLE)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application(TITLE, SignTracker::update, SignTracker::view)
        .theme(SignTracker::theme)
        .centered()
        .run_with(SignTracker::new)
}
