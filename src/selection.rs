//! Two-level brand → device menu as an explicit state machine.
//!
//! [`transition`] is pure: it maps a state and one parsed operator input to
//! the next state. [`select_profile`] drives it against a [`Prompter`].

use crate::config::catalog::{Catalog, DeviceProfile};
use crate::error::DeployError;
use crate::prompt::Prompter;

/// Where the operator is in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState<'a> {
    /// The brand list is shown.
    ChoosingBrand,
    /// The device list of the given brand is shown.
    ChoosingDevice(&'a str),
    /// A device was picked.
    Selected(&'a DeviceProfile),
    /// The operator left the menu.
    Cancelled,
}

impl SelectionState<'_> {
    /// Whether no further input is accepted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Selected(_) | Self::Cancelled)
    }
}

/// One line of operator input, interpreted for a numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    /// A number; `0` is the exit or back sentinel.
    Pick(usize),
    /// Anything that is not a non-negative number.
    Invalid,
    /// Any input given to a "press Enter" pause.
    Acknowledge,
}

/// Parse a menu answer. Surrounding whitespace is ignored.
#[must_use]
pub fn parse_choice(line: &str) -> MenuInput {
    line.trim()
        .parse::<usize>()
        .map_or(MenuInput::Invalid, MenuInput::Pick)
}

/// Compute the next state for `input`.
///
/// Out-of-range and non-numeric input leave the state unchanged. A brand
/// with no devices returns to the brand list on any input. Terminal states
/// never change.
#[must_use]
pub fn transition<'a>(
    state: SelectionState<'a>,
    catalog: &'a Catalog,
    input: MenuInput,
) -> SelectionState<'a> {
    match state {
        SelectionState::ChoosingBrand => match input {
            MenuInput::Pick(0) => SelectionState::Cancelled,
            MenuInput::Pick(n) => catalog
                .list_brands()
                .get(n - 1)
                .map_or(state, |brand| SelectionState::ChoosingDevice(brand.as_str())),
            MenuInput::Invalid | MenuInput::Acknowledge => state,
        },
        SelectionState::ChoosingDevice(brand) => {
            let profiles = catalog.list_profiles(brand);
            if profiles.is_empty() {
                return SelectionState::ChoosingBrand;
            }
            match input {
                MenuInput::Pick(0) => SelectionState::ChoosingBrand,
                MenuInput::Pick(n) => profiles
                    .get(n - 1)
                    .copied()
                    .map_or(state, SelectionState::Selected),
                MenuInput::Invalid | MenuInput::Acknowledge => state,
            }
        }
        SelectionState::Selected(_) | SelectionState::Cancelled => state,
    }
}

/// Run the menu until the operator picks a device or exits.
///
/// Returns `Ok(None)` when the operator exits from the brand list.
///
/// # Errors
///
/// Returns [`DeployError::InputUnavailable`] if input runs out at any prompt.
pub fn select_profile<'a>(
    catalog: &'a Catalog,
    prompter: &dyn Prompter,
) -> Result<Option<&'a DeviceProfile>, DeployError> {
    let mut state = SelectionState::ChoosingBrand;
    loop {
        let input = match state {
            SelectionState::Selected(profile) => return Ok(Some(profile)),
            SelectionState::Cancelled => return Ok(None),
            SelectionState::ChoosingBrand => {
                prompter.show_menu("Please select a brand", catalog.list_brands(), "Exit");
                read_choice(prompter)?
            }
            SelectionState::ChoosingDevice(brand) => {
                let profiles = catalog.list_profiles(brand);
                if profiles.is_empty() {
                    prompter.notice(&format!("No devices found for {brand}."));
                    prompter.read_line("Press Enter to go back...")?;
                    MenuInput::Acknowledge
                } else {
                    let names: Vec<String> =
                        profiles.iter().map(|p| p.display_name.clone()).collect();
                    prompter.show_menu(
                        &format!("Available devices for: {brand}"),
                        &names,
                        "Back",
                    );
                    read_choice(prompter)?
                }
            }
        };

        let next = transition(state, catalog, input);
        if next == state {
            prompter.notice("Invalid selection, please try again.");
        }
        state = next;
    }
}

fn read_choice(prompter: &dyn Prompter) -> Result<MenuInput, DeployError> {
    prompter.read_line("Select number: ").map(|line| parse_choice(&line))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::prompt::{MockPrompter, ScriptedPrompter};

    fn catalog() -> Catalog {
        Catalog::new(
            vec!["Alpha".to_string(), "Empty".to_string()],
            vec![
                DeviceProfile::new("z", "Zeta", "Alpha", &[]),
                DeviceProfile::new("b", "Beta", "Alpha", &[]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn parse_choice_accepts_numbers_only() {
        assert_eq!(parse_choice(" 2 \n"), MenuInput::Pick(2));
        assert_eq!(parse_choice("0"), MenuInput::Pick(0));
        assert_eq!(parse_choice("abc"), MenuInput::Invalid);
        assert_eq!(parse_choice("-1"), MenuInput::Invalid);
        assert_eq!(parse_choice(""), MenuInput::Invalid);
    }

    #[test]
    fn every_brand_index_selects_that_brand() {
        let catalog = Catalog::builtin();
        for (i, brand) in catalog.list_brands().iter().enumerate() {
            assert_eq!(
                transition(SelectionState::ChoosingBrand, &catalog, MenuInput::Pick(i + 1)),
                SelectionState::ChoosingDevice(brand.as_str())
            );
        }
    }

    #[test]
    fn zero_at_brand_cancels() {
        let catalog = catalog();
        assert_eq!(
            transition(SelectionState::ChoosingBrand, &catalog, MenuInput::Pick(0)),
            SelectionState::Cancelled
        );
    }

    #[test]
    fn out_of_range_and_invalid_stay_put() {
        let catalog = catalog();
        for input in [MenuInput::Pick(3), MenuInput::Invalid] {
            assert_eq!(
                transition(SelectionState::ChoosingBrand, &catalog, input),
                SelectionState::ChoosingBrand
            );
            assert_eq!(
                transition(SelectionState::ChoosingDevice("Alpha"), &catalog, input),
                SelectionState::ChoosingDevice("Alpha")
            );
        }
    }

    #[test]
    fn device_index_follows_sorted_order() {
        let catalog = catalog();
        let state = transition(
            SelectionState::ChoosingDevice("Alpha"),
            &catalog,
            MenuInput::Pick(1),
        );
        assert!(
            matches!(state, SelectionState::Selected(p) if p.display_name == "Beta"),
            "unexpected state {state:?}"
        );
    }

    #[test]
    fn zero_at_device_goes_back() {
        let catalog = catalog();
        assert_eq!(
            transition(SelectionState::ChoosingDevice("Alpha"), &catalog, MenuInput::Pick(0)),
            SelectionState::ChoosingBrand
        );
    }

    #[test]
    fn empty_brand_returns_on_any_input() {
        let catalog = catalog();
        for input in [MenuInput::Acknowledge, MenuInput::Pick(1), MenuInput::Invalid] {
            assert_eq!(
                transition(SelectionState::ChoosingDevice("Empty"), &catalog, input),
                SelectionState::ChoosingBrand
            );
        }
    }

    #[test]
    fn terminal_states_are_absorbing() {
        let catalog = catalog();
        let profile = &catalog.profiles()[0];
        for state in [SelectionState::Cancelled, SelectionState::Selected(profile)] {
            assert!(state.is_terminal());
            assert_eq!(transition(state, &catalog, MenuInput::Pick(1)), state);
        }
        assert!(!SelectionState::ChoosingBrand.is_terminal());
    }

    #[test]
    fn select_profile_with_back_navigation() {
        let catalog = catalog();
        let prompter = ScriptedPrompter::new(["1", "0", "2", "", "1", "x", "2"]);
        let selected = select_profile(&catalog, &prompter).unwrap().unwrap();
        assert_eq!(selected.source_id, "z");
        assert_eq!(prompter.remaining(), 0);
        let shown = prompter.shown();
        assert!(shown.iter().any(|s| s == "No devices found for Empty."));
        assert!(shown.iter().any(|s| s == "Invalid selection, please try again."));
    }

    #[test]
    fn select_profile_exit_returns_none() {
        let catalog = catalog();
        let prompter = ScriptedPrompter::new(["0"]);
        assert!(select_profile(&catalog, &prompter).unwrap().is_none());
    }

    #[test]
    fn select_profile_fails_when_input_runs_out() {
        let catalog = catalog();
        let prompter = ScriptedPrompter::new(["1"]);
        let err = select_profile(&catalog, &prompter).unwrap_err();
        assert!(matches!(err, DeployError::InputUnavailable(_)));
    }

    #[test]
    fn eof_at_empty_brand_pause_propagates() {
        let catalog = catalog();
        let prompter = ScriptedPrompter::new(["2"]);
        let err = select_profile(&catalog, &prompter).unwrap_err();
        assert!(matches!(err, DeployError::InputUnavailable(_)));
    }

    #[test]
    fn menus_show_brands_then_sorted_devices() {
        let catalog = catalog();
        let mut prompter = MockPrompter::new();
        let mut seq = mockall::Sequence::new();
        prompter
            .expect_show_menu()
            .withf(|title, options, zero| {
                title.to_string() == "Please select a brand"
                    && options.to_vec() == ["Alpha", "Empty"]
                    && zero.to_string() == "Exit"
            })
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        prompter
            .expect_read_line()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("1".to_string()));
        prompter
            .expect_show_menu()
            .withf(|title, options, zero| {
                title.to_string() == "Available devices for: Alpha"
                    && options.to_vec() == ["Beta", "Zeta"]
                    && zero.to_string() == "Back"
            })
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        prompter
            .expect_read_line()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("2".to_string()));
        prompter.expect_notice().never();

        let selected = select_profile(&catalog, &prompter).unwrap().unwrap();
        assert_eq!(selected.display_name, "Zeta");
    }
}
