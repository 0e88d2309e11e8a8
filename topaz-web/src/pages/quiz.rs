//! The quiz page: fetches the definition, opens or rehydrates the session,
//! and threads it through every submission and retry callback. All mutation
//! is synchronous inside callbacks; the fetch is the only async boundary and
//! is awaited before any session exists.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use topaz_quiz::{
    AnswerSheet, BlockSubmit, ItemKey, ItemRecord, QuizModality, QuizSession, SessionStore,
    SubmitResult, reshuffle, retry_all, retry_incorrect_only,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::catalog;
use crate::components::choice_card::ChoiceCard;
use crate::components::lab_card::LabCard;
use crate::components::placeholder::NotAvailable;
use crate::components::progress::ProgressTracker;
use crate::loader;
use crate::storage::{self, LastVisited, LocalStorageStore};

#[derive(Properties, Clone, PartialEq)]
pub struct QuizPageProps {
    /// Catalog id of the quiz to open.
    pub id: String,
}

#[derive(PartialEq)]
enum LoadState {
    Loading,
    Unavailable,
    Ready(QuizSession),
}

#[function_component(QuizPage)]
pub fn quiz_page(props: &QuizPageProps) -> Html {
    let state = use_state(|| LoadState::Loading);

    {
        let state = state.clone();
        use_effect_with(props.id.clone(), move |id: &String| {
            let Some(info) = catalog::find(id) else {
                state.set(LoadState::Unavailable);
                return;
            };
            storage::save_last_visited(&LastVisited {
                page_id: info.id.to_string(),
                quiz_file: Some(info.quiz_file.to_string()),
            });
            state.set(LoadState::Loading);
            spawn_local(async move {
                match loader::fetch_definition(info.quiz_file, info.modality).await {
                    Ok(definition) => {
                        let saved = LocalStorageStore.load(info.quiz_file);
                        let session = QuizSession::restore_or_create(
                            definition,
                            saved,
                            info.quiz_file,
                            info.container_id,
                        );
                        state.set(LoadState::Ready(session));
                    }
                    Err(err) => {
                        log::error!("could not start quiz {}: {err}", info.quiz_file);
                        state.set(LoadState::Unavailable);
                    }
                }
            });
        });
    }

    let on_check = {
        let state = state.clone();
        Callback::from(move |(question_index, selected): (usize, String)| {
            if let LoadState::Ready(session) = &*state {
                let mut next = session.clone();
                let result = next.submit_choice(question_index, &selected, false);
                if matches!(result, SubmitResult::Graded(_)) {
                    LocalStorageStore.save(next.session_key(), &next.to_saved());
                    state.set(LoadState::Ready(next));
                }
            }
        })
    };

    let on_check_block = {
        let state = state.clone();
        Callback::from(move |(block, sheet): (String, AnswerSheet)| {
            if let LoadState::Ready(session) = &*state {
                let mut next = session.clone();
                let result = next.submit_lab_block(&block, &sheet, false);
                if matches!(result, BlockSubmit::Graded(_)) {
                    LocalStorageStore.save(next.session_key(), &next.to_saved());
                    state.set(LoadState::Ready(next));
                }
            }
        })
    };

    let on_retry_all = {
        let state = state.clone();
        Callback::from(move |()| {
            if let LoadState::Ready(session) = &*state {
                LocalStorageStore.remove(session.session_key());
                let fresh = retry_all(session.clone());
                LocalStorageStore.save(fresh.session_key(), &fresh.to_saved());
                state.set(LoadState::Ready(fresh));
            }
        })
    };

    let on_retry_incorrect = {
        let state = state.clone();
        Callback::from(move |()| {
            if let LoadState::Ready(session) = &*state {
                if !session.has_incorrect() {
                    return;
                }
                let mut next = session.clone();
                retry_incorrect_only(&mut next);
                LocalStorageStore.save(next.session_key(), &next.to_saved());
                state.set(LoadState::Ready(next));
            }
        })
    };

    let on_reshuffle = {
        let state = state.clone();
        Callback::from(move |()| {
            if let LoadState::Ready(session) = &*state {
                LocalStorageStore.remove(session.session_key());
                let mut rng = SmallRng::from_entropy();
                let fresh = reshuffle(session.clone(), &mut rng);
                LocalStorageStore.save(fresh.session_key(), &fresh.to_saved());
                state.set(LoadState::Ready(fresh));
            }
        })
    };

    match &*state {
        LoadState::Loading => html! { <div class="loading">{ "Loading quiz..." }</div> },
        LoadState::Unavailable => html! { <NotAvailable /> },
        LoadState::Ready(session) => {
            let title = catalog::find(&props.id).map_or("Quiz", |info| info.title);
            let snapshot = session.progress();
            let body = match session.modality() {
                QuizModality::SingleChoice => session
                    .working_items()
                    .map(|item| {
                        let record = session
                            .record_of(&ItemKey::Question(item.source_index))
                            .filter(|record| record.status.is_checked())
                            .cloned();
                        html! {
                            <ChoiceCard
                                key={item.source_index.to_string()}
                                number={item.position + 1}
                                source_index={item.source_index}
                                question={item.question.clone()}
                                choice_order={item.choice_order.to_vec()}
                                {record}
                                on_check={on_check.clone()}
                            />
                        }
                    })
                    .collect::<Html>(),
                QuizModality::LabMultiPart => session
                    .source()
                    .lab_questions()
                    .unwrap_or_default()
                    .iter()
                    .map(|block| {
                        let records: BTreeMap<String, ItemRecord> = block
                            .parts()
                            .filter_map(|part| {
                                session
                                    .record_of(&ItemKey::Part(part.id.clone()))
                                    .filter(|record| record.status.is_checked())
                                    .map(|record| (part.id.clone(), record.clone()))
                            })
                            .collect();
                        html! {
                            <LabCard
                                key={block.question_number.clone()}
                                block={block.clone()}
                                {records}
                                on_check={on_check_block.clone()}
                            />
                        }
                    })
                    .collect::<Html>(),
            };
            let on_reshuffle_prop = (session.modality() == QuizModality::SingleChoice)
                .then(|| on_reshuffle.clone());

            html! {
                <div id={session.container_id().to_string()} class="main-content-pane">
                    <h1 class="quiz-title">{ title }</h1>
                    <ProgressTracker
                        snapshot={snapshot}
                        modality={session.modality()}
                        on_retry_all={on_retry_all.clone()}
                        on_retry_incorrect={on_retry_incorrect.clone()}
                        on_reshuffle={on_reshuffle_prop}
                    />
                    <div class="quiz-cards">{ body }</div>
                </div>
            }
        }
    }
}
