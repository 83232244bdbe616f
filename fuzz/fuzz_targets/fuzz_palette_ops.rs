#![no_main]

use arbitrary::Arbitrary;
use cmdpal_core::{KeyCode, KeyEvent, Modifiers};
use cmdpal_widgets::command::{Command, CommandConfig, GroupProps, Item, ItemProps};
use libfuzzer_sys::fuzz_target;

const MAX_OPS: usize = 64;

#[derive(Debug, Arbitrary)]
enum Op {
    Mount { value: u8, grouped: bool, disabled: bool },
    Unmount { index: u8 },
    Search(u8),
    Key { code: u8, alt: bool, meta: bool },
    Loop(bool),
}

const SEARCHES: &[&str] = &["", "a", "b", "ab", "item", "zz", "1"];

fn key(code: u8) -> KeyCode {
    match code % 5 {
        0 => KeyCode::Down,
        1 => KeyCode::Up,
        2 => KeyCode::Home,
        3 => KeyCode::End,
        _ => KeyCode::Enter,
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let cmd = Command::new(CommandConfig::new());
    let group = cmd.group(GroupProps::new().heading("g"));
    let mut items: Vec<Item> = Vec::new();

    for op in ops.into_iter().take(MAX_OPS) {
        match op {
            Op::Mount { value, grouped, disabled } => {
                let tag = if value % 2 == 0 { "a" } else { "b" };
                let props = ItemProps::new()
                    .value(format!("item {} {tag}", value % 16))
                    .disabled(disabled);
                let item = if grouped { group.item(props) } else { cmd.item(props) };
                items.push(item);
            }
            Op::Unmount { index } => {
                if !items.is_empty() {
                    let at = usize::from(index) % items.len();
                    drop(items.remove(at));
                }
            }
            Op::Search(i) => cmd.store().set_search(SEARCHES[usize::from(i) % SEARCHES.len()]),
            Op::Key { code, alt, meta } => {
                let mut mods = Modifiers::NONE;
                if alt {
                    mods |= Modifiers::ALT;
                }
                if meta {
                    mods |= Modifiers::SUPER;
                }
                let mut event = KeyEvent::new(key(code)).with_modifiers(mods);
                cmd.handle_key(&mut event);
            }
            Op::Loop(on) => cmd.configure(|c| c.loop_navigation = on),
        }

        let state = cmd.store().snapshot().clone();
        let registry = cmd.store().registry();
        let expected = if state.search.is_empty() {
            registry.item_count()
        } else {
            registry.items().filter(|id| state.filtered.score(*id) > 0.0).count()
        };
        assert_eq!(state.filtered.count, expected);
    }
});
