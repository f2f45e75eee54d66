use crate::utils::*;
use bitflags::bitflags;
use clap::Args;
use gloo::events::EventListener;
use gloo::timers::callback::{Interval, Timeout};
use radius_core as game;
use serde::{Deserialize, Serialize};
use web_sys::HtmlInputElement;
use web_time::Instant;
use yew::prelude::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

fn window_viewport_size() -> game::ViewportSize {
    let window = gloo::utils::window();
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|value| value.as_f64()).unwrap_or(0.)
    };
    game::ViewportSize::from_pixels(
        dimension(window.inner_width()),
        dimension(window.inner_height()),
        game::CELL_SIZE_PX,
    )
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct DragState {
    gesture: game::DragGesture,
    moved: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Reveal(game::Coords),
    Hover(Option<game::Coords>),
    PointerDown((f64, f64)),
    PointerMove((f64, f64), u16),
    PointerUp,
    Resize,
    NavigatorInput(String),
    NavigatorSubmit,
    ToggleNavigator,
    ToggleAutoPlay,
    AutoPlayTick(game::TickToken),
    ToggleBreakdown,
    Restart,
    Frame,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    coords: game::Coords,
    value: Option<game::CellValue>,
    in_domain: bool,
    #[prop_or_default]
    target_opacity: Option<f64>,
    #[prop_or_default]
    highlight: Option<f64>,
    #[prop_or_default]
    pulsing: bool,
    #[prop_or_default]
    clickable: bool,
    callback: Callback<Msg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        coords,
        value,
        in_domain,
        target_opacity,
        highlight,
        pulsing,
        clickable,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match value {
            None if !in_domain => classes!("out-of-bounds"),
            None => classes!(),
            Some(game::CellValue::Decorative(token)) => classes!("revealed", token.name()),
            Some(value) => classes!("revealed", value_size_class(value)),
        }
    );
    if clickable {
        class.push("clickable");
    }
    if pulsing {
        class.push("pulse");
    }
    if highlight.is_some() {
        class.push("in-radius");
    }
    if target_opacity.is_some() {
        class.push("target");
    }

    let mut style = String::new();
    if let Some(opacity) = highlight {
        style.push_str(&format!("--ring-opacity: {:.3};", opacity * 1.2));
    }
    if let Some(opacity) = target_opacity {
        style.push_str(&format!("--target-opacity: {:.3};", opacity));
    }

    let onclick = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            if in_domain {
                callback.emit(Msg::Reveal(coords));
            }
        })
    };

    let onmouseenter = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            callback.emit(Msg::Hover(Some(coords)));
            log::trace!("{} mouse enter", coords);
        })
    };

    html! {
        <div {class} {style} {onclick} {onmouseenter} data-coords={coords.to_string()}>
            if let Some(text) = value.and_then(cell_text) {
                <span>{text}</span>
            }
        </div>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start with the bot playing
    #[arg(long)]
    autoplay: bool,
}

pub(crate) struct GameView {
    game: game::Game,
    hovered: Option<game::Coords>,
    drag: Option<DragState>,
    suppress_click: bool,
    navigator_open: bool,
    navigator_input: String,
    navigator_error: Option<String>,
    target: Option<game::TargetMarker>,
    pulse: Option<game::Pulse>,
    show_breakdown: bool,
    animating: bool,
    autoplay_timer: Option<Timeout>,
    _frame_interval: Interval,
    _resize_listener: EventListener,
}

impl GameView {
    fn create_frame_interval(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(100, move || link.send_message(Msg::Frame))
    }

    fn create_resize_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::window(), "resize", move |_| {
            link.send_message(Msg::Resize)
        })
    }

    /// Replaces the pending auto-play timeout, dropping the old one cancels it.
    fn schedule_tick(&mut self, ctx: &Context<Self>, tick: Option<game::ScheduledTick>) {
        self.autoplay_timer = tick.map(|tick| {
            let link = ctx.link().clone();
            let token = tick.token;
            let millis = u32::try_from(tick.delay.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(millis, move || link.send_message(Msg::AutoPlayTick(token)))
        });
    }

    fn on_report(&mut self, report: &game::RevealReport) {
        self.pulse = game::Pulse::from_report(report, Instant::now());
        if let game::GameState::Ended { final_score, reason } = report.state {
            log::info!("{} final score: {}", end_label(reason), final_score);
            self.autoplay_timer = None;
        }
    }

    fn reveal(&mut self, coords: game::Coords) -> bool {
        match self.game.reveal(coords) {
            Ok(report) => {
                self.on_report(&report);
                true
            }
            Err(err) => {
                log::debug!("reveal at {} ignored: {}", coords, err);
                false
            }
        }
    }

    fn submit_navigator(&mut self) -> bool {
        let parsed = self
            .navigator_input
            .parse::<game::Coords>()
            .map_err(|err| err.to_string())
            .and_then(|display| {
                let coords = game::Coords::from_display(display);
                self.game
                    .jump_to(coords)
                    .map(|_| coords)
                    .map_err(|_| {
                        format!(
                            "Coordinates must be between {} and {}",
                            game::MIN_COORD,
                            game::MAX_COORD
                        )
                    })
            });

        match parsed {
            Ok(coords) => {
                self.navigator_error = None;
                self.target = Some(game::TargetMarker::new(coords, Instant::now()));
            }
            Err(err) => {
                log::debug!("navigator input rejected: {}", err);
                self.navigator_error = Some(err);
            }
        }
        true
    }

    fn is_animating(&self, now: Instant) -> bool {
        self.pulse.as_ref().is_some_and(|pulse| pulse.is_active(now))
            || self.target.is_some_and(|target| target.opacity(now).is_some())
    }

    fn view_score(&self, ctx: &Context<Self>) -> Html {
        let lines = match self.game.engine().last_report() {
            Some(report) => report_lines(report),
            None => vec!["No calculations yet".to_string()],
        };

        html! {
            <section class="score">
                <div class="score-line">
                    {format!("Your Score: {}", self.game.current_score())}
                    <button onclick={ctx.link().callback(|_| Msg::ToggleBreakdown)}>
                        {if self.show_breakdown { "▴" } else { "▾" }}
                    </button>
                </div>
                if self.show_breakdown {
                    <div class="breakdown">
                        { for lines.into_iter().map(|line| html! { <div>{line}</div> }) }
                    </div>
                }
            </section>
        }
    }

    fn view_navigator(&self, ctx: &Context<Self>) -> Html {
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::NavigatorSubmit
        });
        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::NavigatorInput(input.value())
        });
        let toggle_label = if self.navigator_open {
            "Close Navigator"
        } else {
            "Open Navigator"
        };

        html! {
            <nav>
                <button onclick={ctx.link().callback(|_| Msg::ToggleNavigator)} title={toggle_label}>
                    {"🧭"}
                </button>
                if self.navigator_open {
                    <form {onsubmit}>
                        <input
                            type="text"
                            placeholder="x:y"
                            value={self.navigator_input.clone()}
                            class={classes!(self.navigator_error.is_some().then_some("error"))}
                            {oninput}
                        />
                        <button type="submit">{"Go"}</button>
                        if let Some(err) = &self.navigator_error {
                            <div class="error">{err.clone()}</div>
                        }
                    </form>
                }
            </nav>
        }
    }

    fn view_game_over(&self, ctx: &Context<Self>) -> Html {
        let game::GameState::Ended { final_score, reason } = self.game.lifecycle_state() else {
            return html! {};
        };

        html! {
            <dialog open={true}>
                <h2>{end_label(reason)}</h2>
                <p>{format!("Final Score: {}", final_score)}</p>
                <button onclick={ctx.link().callback(|_| Msg::Restart)}>{"Play Again"}</button>
            </dialog>
        }
    }

    fn view_grid(&self, ctx: &Context<Self>) -> Html {
        let now = Instant::now();
        let size = self.game.viewport().size();
        let radius = self.game.engine().config().highlight_radius;
        let dragging = self.drag.is_some_and(|drag| drag.moved);
        let playable = self.game.lifecycle_state().is_active();
        let callback = ctx.link().callback(|msg: Msg| msg);

        let onmousedown = ctx.link().callback(|e: MouseEvent| {
            Msg::PointerDown((f64::from(e.client_x()), f64::from(e.client_y())))
        });
        let onmousemove = ctx.link().callback(|e: MouseEvent| {
            Msg::PointerMove((f64::from(e.client_x()), f64::from(e.client_y())), e.buttons())
        });
        let onmouseleave = ctx.link().callback(|_: MouseEvent| Msg::Hover(None));

        let style = format!(
            "grid-template-columns: repeat({}, {}px);",
            size.width(),
            game::CELL_SIZE_PX
        );

        html! {
            <div
                class={classes!("grid", if dragging { "dragging" } else { "grabbable" })}
                {style}
                {onmousedown}
                {onmousemove}
                {onmouseleave}
            >
                {
                    for self.game.viewport().visible_cells().map(|(coords, in_domain)| {
                        let value = self.game.value_at(coords);
                        let highlight = self
                            .hovered
                            .filter(|_| in_domain)
                            .and_then(|hovered| game::highlight_intensity(hovered.distance(coords), radius));
                        let target_opacity = self
                            .target
                            .filter(|target| target.coords == coords)
                            .and_then(|target| target.opacity(now));
                        let pulsing = self
                            .pulse
                            .as_ref()
                            .is_some_and(|pulse| pulse.contains(coords, now));
                        let clickable = playable && in_domain && value.is_none() && !dragging;
                        html! {
                            <CellView
                                key={coords.to_string()}
                                {coords}
                                {value}
                                {in_domain}
                                {target_opacity}
                                {highlight}
                                {pulsing}
                                {clickable}
                                callback={callback.clone()}
                            />
                        }
                    })
                }
            </div>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        let game = game::Game::with_seed(Default::default(), window_viewport_size(), seed)
            .expect("default rules must be valid");

        let mut view = Self {
            game,
            hovered: None,
            drag: None,
            suppress_click: false,
            navigator_open: false,
            navigator_input: String::new(),
            navigator_error: None,
            target: None,
            pulse: None,
            show_breakdown: false,
            animating: false,
            autoplay_timer: None,
            _frame_interval: GameView::create_frame_interval(ctx),
            _resize_listener: GameView::create_resize_listener(ctx),
        };

        if props.autoplay {
            let tick = view.game.set_auto_play(true);
            view.schedule_tick(ctx, tick);
        }

        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Reveal(coords) => {
                // the click that ends a drag
                if std::mem::take(&mut self.suppress_click) {
                    return false;
                }
                log::debug!("reveal cell: {}", coords);
                self.reveal(coords)
            }
            Hover(hovered) => {
                let updated = self.hovered != hovered;
                self.hovered = hovered;
                if let Some(coords) = hovered {
                    let title = coords.to_display().to_string();
                    gloo::utils::document().set_title(&title);
                } else {
                    gloo::utils::document().set_title("0:0");
                    self.drag = None;
                }
                updated
            }
            PointerDown(pointer) => {
                let gesture =
                    game::DragGesture::begin(self.game.viewport(), pointer, game::CELL_SIZE_PX);
                self.drag = Some(DragState {
                    gesture,
                    moved: false,
                });
                self.suppress_click = false;
                false
            }
            PointerMove(pointer, buttons) => {
                let buttons = MouseButtons::from_bits_truncate(buttons);
                let Some(drag) = self.drag.as_mut() else {
                    return false;
                };
                if !buttons.contains(MouseButtons::LEFT) {
                    self.drag = None;
                    return false;
                }
                let outcome = self.game.drag(&drag.gesture, pointer);
                log::trace!("drag {:?}: {:?}", pointer, outcome);
                if outcome.has_update() {
                    drag.moved = true;
                }
                outcome.has_update()
            }
            PointerUp => {
                self.suppress_click = self.drag.take().is_some_and(|drag| drag.moved);
                self.suppress_click
            }
            Resize => {
                let size = window_viewport_size();
                let updated = self.game.viewport().size() != size;
                self.game.resize(size);
                updated
            }
            NavigatorInput(input) => {
                self.navigator_error = None;
                self.navigator_input = input;
                true
            }
            NavigatorSubmit => self.submit_navigator(),
            ToggleNavigator => {
                self.navigator_open = !self.navigator_open;
                true
            }
            ToggleAutoPlay => {
                let enable = !self.game.is_auto_playing();
                let tick = self.game.set_auto_play(enable);
                self.schedule_tick(ctx, tick);
                true
            }
            AutoPlayTick(token) => {
                self.autoplay_timer = None;
                match self.game.auto_play_tick(token) {
                    game::TickOutcome::Ignored => false,
                    game::TickOutcome::Exhausted => {
                        log::debug!("bot found nothing left to reveal");
                        true
                    }
                    game::TickOutcome::Revealed {
                        coords,
                        report,
                        next,
                    } => {
                        log::trace!("bot revealed {}", coords);
                        self.on_report(&report);
                        self.schedule_tick(ctx, next);
                        true
                    }
                }
            }
            ToggleBreakdown => {
                self.show_breakdown = !self.show_breakdown;
                true
            }
            Restart => {
                self.autoplay_timer = None;
                self.pulse = None;
                self.game.restart();
                true
            }
            Frame => {
                // one more render after the last frame clears the effects
                let animating = self.is_animating(Instant::now());
                let was_animating = std::mem::replace(&mut self.animating, animating);
                animating || was_animating
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let auto_label = if self.game.is_auto_playing() {
            "Stop Auto-play"
        } else {
            "Start Auto-play"
        };
        let onmouseup = ctx.link().callback(|_: MouseEvent| Msg::PointerUp);

        html! {
            <div class="radius" {onmouseup}>
                <h1>{"Radius"}</h1>
                {self.view_navigator(ctx)}
                {self.view_score(ctx)}
                <button
                    class="autoplay"
                    disabled={!self.game.lifecycle_state().is_active()}
                    onclick={ctx.link().callback(|_| Msg::ToggleAutoPlay)}
                >
                    {auto_label}
                </button>
                {self.view_grid(ctx)}
                {self.view_game_over(ctx)}
            </div>
        }
    }
}
