use jetplot_core::Point;
use jetplot_designer::{
    Command, CommandCompiler, CommandKind, CommandRunner, FinalizedShape, PenState, ShapeKind,
    Step, Style,
};

fn triangle() -> FinalizedShape {
    FinalizedShape {
        kind: ShapeKind::Outline,
        style: Style::default(),
        subpaths: vec![vec![
            Point::new(10.0, 10.0),
            Point::new(90.0, 10.0),
            Point::new(50.0, 90.0),
        ]],
        dots: Vec::new(),
    }
}

fn dots(color: &str) -> FinalizedShape {
    FinalizedShape {
        kind: ShapeKind::Stipple,
        style: Style {
            color: Some(color.to_string()),
            fill_density: Some(4),
        },
        subpaths: Vec::new(),
        dots: vec![Point::new(20.0, 20.0), Point::new(24.0, 20.0)],
    }
}

#[test]
fn test_three_point_outline_gives_five_commands() {
    let commands = CommandCompiler::new(100.0, 100.0).compile(&triangle());
    assert_eq!(commands.len(), 5);
    assert_eq!(commands[0], Command::move_to(0.1, 0.1, "red"));
    assert_eq!(commands[1].command, CommandKind::PenDown);
    assert_eq!(commands[4].command, CommandKind::PenUp);
    for p in commands.iter().filter_map(Command::position) {
        assert!((0.0..=1.0).contains(&p.x));
        assert!((0.0..=1.0).contains(&p.y));
    }
}

#[test]
fn test_runner_replays_whole_stream() {
    let stream = CommandCompiler::new(100.0, 100.0).compile_all(&[triangle(), dots("blue")]);
    let n = stream.len();
    assert_eq!(n, 5 + 6);

    let mut runner = CommandRunner::new(stream);
    runner.start();

    let mut pen_down_moves = 0;
    for _ in 0..n {
        match runner.next() {
            Step::Executed(command) => {
                if command.command == CommandKind::MoveTo && runner.pen() == PenState::Down {
                    pen_down_moves += 1;
                }
            }
            other => panic!("stream ended early: {:?}", other),
        }
    }
    assert_eq!(pen_down_moves, 2);
    assert_eq!(runner.pen(), PenState::Up);
    assert_eq!(runner.next(), Step::Complete);
    assert_eq!(runner.next(), Step::Complete);
}

#[test]
fn test_layers_partition_the_stream() {
    let stream = CommandCompiler::new(100.0, 100.0).compile_all(&[
        dots("blue"),
        triangle(),
        dots("blue"),
        dots("green"),
    ]);
    let layers = stream.layers();

    let colors: Vec<_> = layers.iter().map(|l| l.color.as_str()).collect();
    assert_eq!(colors, vec!["blue", "red", "green"]);
    assert_eq!(
        layers.iter().map(|l| l.commands.len()).sum::<usize>(),
        stream.len()
    );

    // Each layer is a subsequence of the stream.
    for layer in &layers {
        let mut rest = stream.commands().iter();
        for command in &layer.commands {
            assert!(rest.any(|c| c == command));
        }
    }
}

#[test]
fn test_stream_json_round_trip() {
    let stream = CommandCompiler::new(100.0, 100.0).compile_all(&[triangle()]);
    let json = stream.to_json().unwrap();
    assert!(json.starts_with(r#"[{"command":"MOVE_TO""#));
    assert!(json.contains(r#"{"command":"PEN_UP","color":"red"}"#));
}
