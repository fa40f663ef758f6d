use crate::geolocation::BrowserGeolocation;
use crate::map::MapView;
use access_core::config::MapConfig;
use access_core::geolocation;
use access_core::shell::ShellState;
use access_core::view::{marker_style, report_summary, MapEvent};
use access_core::{AccessFeature, AccessValue, LatLng, OverallRating, Place, PlaceId};
use futures::StreamExt;
use leptos::*;
use report_form::ReportForm;
use wasm_bindgen_futures::spawn_local;

fn rating_badge(rating: &OverallRating) -> &'static str {
    match rating {
        OverallRating::Accessible => "badge success",
        OverallRating::PartiallyAccessible => "badge warning",
        OverallRating::NotAccessible => "badge destructive",
        OverallRating::Unknown | OverallRating::Other(_) => "badge secondary",
    }
}

fn access_class(value: &AccessValue) -> &'static str {
    match value {
        AccessValue::Yes => "ok",
        AccessValue::No => "warn",
        AccessValue::Unknown | AccessValue::Other(_) => "meta",
    }
}

fn load_config() -> MapConfig {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("map-config"))
        .and_then(|el| el.text_content());
    MapConfig::from_json_or_default(raw.as_deref())
}

/// Feeds browser position fixes into the shell until the app unmounts.
fn track_position(shell: RwSignal<ShellState>) {
    let provider = match BrowserGeolocation::from_window() {
        Ok(provider) => provider,
        Err(err) => {
            tracing::debug!(error = %err, "geolocation unavailable");
            return;
        }
    };

    let (watch, mut fixes) = geolocation::activate(provider);
    on_cleanup(move || drop(watch));

    spawn_local(async move {
        while let Some(fix) = fixes.next().await {
            if shell.try_update(|s| s.on_position(fix)).is_none() {
                break;
            }
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    let config = load_config();
    let shell = create_rw_signal(ShellState::seeded(config.clone()));
    let form = create_rw_signal(ReportForm::default());

    let places = create_memo(move |_| shell.with(|s| s.places()));
    let selected = create_memo(move |_| shell.with(|s| s.selected_place()));
    let selected_id = create_memo(move |_| shell.with(|s| s.selected_id().cloned()));
    let view_target = create_memo(move |_| shell.with(|s| s.view_target()));
    let user_location = create_memo(move |_| shell.with(|s| s.user_location()));
    let sidebar_open = create_memo(move |_| shell.with(|s| s.sidebar_open));
    let form_open = create_memo(move |_| shell.with(|s| s.report_form_open));

    track_position(shell);

    let open_form = move |target: Option<PlaceId>| {
        form.set(match &target {
            Some(id) => ReportForm::for_place(id),
            None => ReportForm::default(),
        });
        shell.update(ShellState::open_report_form);
    };

    let submit = move || {
        let report = form.get_untracked().into_report();
        shell.update(|s| {
            let outcome = s.on_add_report(report);
            tracing::info!(id = %outcome.id(), "report submitted");
        });
        form.set(ReportForm::default());
    };

    let on_map_click = move |at: LatLng| {
        shell.update_untracked(|s| s.on_map_event(MapEvent::MapClicked(at)));
        form.update(|f| {
            f.latitude = format!("{:.6}", at.lat);
            f.longitude = format!("{:.6}", at.lng);
        });
    };

    view! {
      <div class="layout" class:sidebar-open=move || sidebar_open.get()>
        <header class="topbar">
          <button class="icon" on:click=move |_| shell.update(ShellState::toggle_sidebar)>"☰"</button>
          <h1>"Accessibility Map"</h1>
          <button on:click=move |_| open_form(None)>"Add a place"</button>
        </header>

        <aside class="sidebar panel">
          <h2>"Places"</h2>
          <ul class="place-list">
            <For
              each={move || places.get().iter().cloned().collect::<Vec<_>>()}
              key=|p| (p.id.clone(), p.report_count)
              children=move |p| {
                let id = p.id.clone();
                let row_id = p.id.clone();
                view! {
                  <li
                    class:selected=move || selected_id.with(|s| s.as_ref() == Some(&row_id))
                    on:click=move |_| shell.update(|s| s.on_place_select(id.clone()))
                  >
                    <div><b>{p.name.clone()}</b></div>
                    <div class="meta">{p.address.clone()}</div>
                    <span class=rating_badge(&p.overall_rating)>{p.overall_rating.label()}</span>
                  </li>
                }
              }
            />
          </ul>
        </aside>

        <main class="map-area">
          <MapView
            places=places
            view_target=view_target
            user_location=user_location
            config=config
            on_place_click=move |id: PlaceId| shell.update(|s| s.on_map_event(MapEvent::MarkerClicked(id)))
            on_map_click=on_map_click
          />
        </main>

        {move || selected.get().map(|place| view! {
          <PlacePanel
            place=place
            on_close=move |_| shell.update(ShellState::on_place_close)
            on_report=move |id: PlaceId| open_form(Some(id))
          />
        })}

        <Show when=move || form_open.get() fallback=|| ()>
          <ReportFormPanel
            form=form
            on_submit=move |_| submit()
            on_cancel=move |_| shell.update(ShellState::close_report_form)
          />
        </Show>
      </div>
    }
}

#[component]
fn PlacePanel(
    place: Place,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_report: Callback<PlaceId>,
) -> impl IntoView {
    let style = marker_style(&place.overall_rating);
    let id = place.id.clone();
    let features = AccessFeature::ALL
        .into_iter()
        .map(|feature| {
            let value = place.access(feature).clone();
            view! {
              <li class="step">
                <span>{feature.label()}</span>
                <b class=access_class(&value)>{value.to_string()}</b>
              </li>
            }
        })
        .collect_view();

    view! {
      <section class="panel place-panel">
        <div class="row">
          <h2>{place.name.clone()}</h2>
          <button class="icon" on:click=move |_| on_close.call(())>"✕"</button>
        </div>
        <div class="meta">{place.address.clone()}</div>
        <div class="row">
          <span class="dot" style=format!("background-color: {}", style.color)></span>
          <span class=rating_badge(&place.overall_rating)>{place.overall_rating.label()}</span>
          {place.verified.then(|| view! { <span class="badge outline">"verified"</span> })}
        </div>
        <ul>{features}</ul>
        <div class="meta">{format!("confidence {}", place.confidence_score)}</div>
        {report_summary(place.report_count).map(|text| view! { <div class="reports">{text}</div> })}
        <button on:click=move |_| on_report.call(id.clone())>"Report accessibility"</button>
      </section>
    }
}

#[component]
fn TextField(
    form: RwSignal<ReportForm>,
    label: &'static str,
    read: fn(&ReportForm) -> &str,
    write: fn(&mut ReportForm) -> &mut String,
) -> impl IntoView {
    view! {
      <label class="field">
        <span>{label}</span>
        <input
          prop:value=move || form.with(|f| read(f).to_string())
          on:input=move |ev| form.update(|f| *write(f) = event_target_value(&ev))
          placeholder=label
        />
      </label>
    }
}

#[component]
fn ReportFormPanel(
    form: RwSignal<ReportForm>,
    #[prop(into)] on_submit: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let targets_existing = move || form.with(|f| !f.place_id.trim().is_empty());

    let radio_groups = AccessFeature::ALL
        .into_iter()
        .map(|feature| {
            let options = ["yes", "no", "unknown"]
                .into_iter()
                .map(|value| {
                    view! {
                      <label>
                        <input
                          type="radio"
                          name=feature.field_name()
                          value=value
                          prop:checked=move || form.with(|f| f.access(feature) == value)
                          on:change=move |_| form.update(|f| f.set_access(feature, value))
                        />
                        {value}
                      </label>
                    }
                })
                .collect_view();
            view! {
              <fieldset class="radio-group" role="radiogroup">
                <legend>{feature.label()}</legend>
                {options}
              </fieldset>
            }
        })
        .collect_view();

    let ratings = OverallRating::KNOWN
        .iter()
        .map(|rating| {
            let value = rating.as_str().to_string();
            view! { <option value=value>{rating.label()}</option> }
        })
        .collect_view();

    view! {
      <section class="panel report-form" role="dialog" aria-label="Report accessibility">
        <h2>{move || if targets_existing() { "Update place" } else { "New place" }}</h2>
        <Show when=move || !targets_existing() fallback=|| ()>
          <TextField form=form label="Place name" read=|f| f.place_name.as_str() write=|f| &mut f.place_name/>
          <TextField form=form label="Address" read=|f| f.address.as_str() write=|f| &mut f.address/>
        </Show>
        <div class="row">
          <TextField form=form label="Latitude" read=|f| f.latitude.as_str() write=|f| &mut f.latitude/>
          <TextField form=form label="Longitude" read=|f| f.longitude.as_str() write=|f| &mut f.longitude/>
        </div>
        <div class="meta">"Click the map to fill in coordinates."</div>
        {radio_groups}
        <label class="field">
          <span>"Overall rating"</span>
          <select
            prop:value=move || form.with(|f| f.overall_rating.clone())
            on:change=move |ev| form.update(|f| f.overall_rating = event_target_value(&ev))
          >
            <option value="">"(unchanged)"</option>
            {ratings}
          </select>
        </label>
        <TextField form=form label="Confidence (0-100)" read=|f| f.confidence_score.as_str() write=|f| &mut f.confidence_score/>
        <div class="row">
          <button on:click=move |_| on_submit.call(())>"Submit report"</button>
          <button on:click=move |_| on_cancel.call(())>"Cancel"</button>
        </div>
      </section>
    }
}
