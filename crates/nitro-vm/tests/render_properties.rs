use nitro_bytecode::{ArtifactPaths, ComponentId, Instruction, Template};
use nitro_vm::{RenderConfig, RenderError, Renderer};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn bold_template() -> Template {
    let mut builder = Template::builder();
    builder.add_snippet("<b>").unwrap();
    builder.add_snippet("</b>").unwrap();
    builder
        .add_component([
            Instruction::copy_snippet(0),
            Instruction::copy_data(0),
            Instruction::copy_snippet(1),
        ])
        .unwrap();
    builder.build()
}

fn nested_template() -> Template {
    let mut builder = Template::builder();
    builder.add_snippet("-END-").unwrap();
    builder.add_snippet("-NESTED-").unwrap();
    builder
        .add_component([
            Instruction::push_component(1),
            Instruction::ExecComponent,
            Instruction::copy_snippet(0),
        ])
        .unwrap();
    builder.add_component([Instruction::copy_snippet(1)]).unwrap();
    builder.build()
}

/// A page layout that places a list of items rendered by a shared row component
fn page_template() -> Template {
    let mut builder = Template::builder();
    let open = builder.add_snippet("<ul>").unwrap();
    let close = builder.add_snippet("</ul>").unwrap();
    let li = builder.add_snippet("<li>").unwrap();
    let end_li = builder.add_snippet("</li>").unwrap();

    // 0: page
    builder
        .add_component([
            Instruction::CopySnippet { snippet: open },
            Instruction::push_component(1),
            Instruction::push_component(1),
            Instruction::ExecComponent,
            Instruction::ExecComponent,
            Instruction::CopySnippet { snippet: close },
        ])
        .unwrap();
    // 1: row
    builder
        .add_component([
            Instruction::CopySnippet { snippet: li },
            Instruction::copy_data(0),
            Instruction::CopySnippet { snippet: end_li },
        ])
        .unwrap();
    builder.build()
}

#[test]
fn bold_example() {
    let renderer = Renderer::new(bold_template());
    let out = renderer.render_to_vec(ComponentId(0), &["hi"]).unwrap();
    assert_eq!(out, b"<b>hi</b>");
}

#[test]
fn nesting_example() {
    let renderer = Renderer::new(nested_template());
    let out = renderer.render_to_vec(ComponentId(0), &[] as &[&[u8]]).unwrap();
    assert_eq!(out, b"-NESTED--END-");
}

#[test]
fn repeated_component_shares_data() {
    let renderer = Renderer::new(page_template());
    let out = renderer.render_to_vec(ComponentId(0), &["x"]).unwrap();
    assert_eq!(out, b"<ul><li>x</li><li>x</li></ul>");
}

#[test]
fn render_is_deterministic() {
    let renderer = Renderer::new(page_template());
    let data = [b"a&b".to_vec()];
    let first = renderer.render_to_vec(ComponentId(0), &data).unwrap();
    let second = renderer.render_to_vec(ComponentId(0), &data).unwrap();
    assert_eq!(first, second);
}

#[test]
fn bytes_are_copied_verbatim() {
    let renderer = Renderer::new(bold_template());
    let data: [&[u8]; 1] = [&[0xFF, b'<', 0x00, b'>']];
    let out = renderer.render_to_vec(ComponentId(0), &data).unwrap();
    assert_eq!(out, [b'<', b'b', b'>', 0xFF, b'<', 0x00, b'>', b'<', b'/', b'b', b'>']);
}

#[test]
fn artifacts_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::from_stem(dir.path().join("main"));
    let template = page_template();

    template.write(&paths).unwrap();
    let loaded = Template::load(&paths.snippets, &paths.instructions).unwrap();
    assert_eq!(loaded, template);

    let renderer = Renderer::new(loaded);
    let out = renderer.render_to_vec(ComponentId(0), &["y"]).unwrap();
    assert_eq!(out, b"<ul><li>y</li><li>y</li></ul>");
}

#[test]
fn data_out_of_range_stops_output() {
    let renderer = Renderer::new(bold_template());
    let mut out = Vec::new();
    let result = renderer.render(ComponentId(0), &[] as &[&str], &mut out);

    assert!(matches!(
        result,
        Err(RenderError::DataOutOfRange { index: 0, len: 0 })
    ));
    // The closing snippet after the failing instruction is never written
    assert_eq!(out, b"<b>");
}

#[test]
fn exec_without_push_underflows() {
    let mut builder = Template::builder();
    builder.add_component([Instruction::ExecComponent]).unwrap();
    let renderer = Renderer::new(builder.build());

    let result = renderer.render_to_vec(ComponentId(0), &[] as &[&str]);
    assert!(matches!(
        result,
        Err(RenderError::StackUnderflow {
            component: ComponentId(0)
        })
    ));
}

#[test]
fn mutual_recursion_hits_depth_limit() {
    let mut builder = Template::builder();
    builder.add_snippet("a").unwrap();
    builder
        .add_component([
            Instruction::copy_snippet(0),
            Instruction::push_component(1),
            Instruction::ExecComponent,
        ])
        .unwrap();
    builder
        .add_component([Instruction::push_component(0), Instruction::ExecComponent])
        .unwrap();
    let config = RenderConfig {
        max_depth: 100,
        ..RenderConfig::default()
    };
    let renderer = Renderer::with_config(builder.build(), config);

    let mut out = Vec::new();
    let result = renderer.render(ComponentId(0), &[] as &[&str], &mut out);
    assert!(matches!(result, Err(RenderError::DepthExceeded { limit: 100 })));
    assert_eq!(out.len(), 50);
}

#[test]
fn deep_nesting_does_not_use_native_stack() {
    let mut builder = Template::builder();
    builder
        .add_component([Instruction::push_component(0), Instruction::ExecComponent])
        .unwrap();
    let config = RenderConfig {
        max_depth: 1_000_000,
        ..RenderConfig::default()
    };
    let renderer = Renderer::with_config(builder.build(), config);

    let result = renderer.render_to_vec(ComponentId(0), &[] as &[&str]);
    assert!(matches!(
        result,
        Err(RenderError::DepthExceeded { limit: 1_000_000 })
    ));
}

#[test]
fn reused_context_does_not_carry_pushes_between_renders() {
    let mut builder = Template::builder();
    builder.add_snippet("stale").unwrap();
    builder.add_component([Instruction::push_component(2)]).unwrap();
    builder.add_component([Instruction::ExecComponent]).unwrap();
    builder.add_component([Instruction::copy_snippet(0)]).unwrap();
    let renderer = Renderer::new(builder.build());

    let mut ctx = renderer.create_context();
    let mut out = Vec::new();
    renderer
        .render_with_context(ComponentId(0), &[] as &[&str], &mut out, &mut ctx)
        .unwrap();

    let result = renderer.render_with_context(ComponentId(1), &[] as &[&str], &mut out, &mut ctx);
    assert!(matches!(
        result,
        Err(RenderError::StackUnderflow {
            component: ComponentId(1)
        })
    ));
    assert!(out.is_empty());
}

#[test]
fn residual_pushes_are_ignored() {
    let mut builder = Template::builder();
    builder.add_snippet("ok").unwrap();
    builder
        .add_component([Instruction::push_component(0), Instruction::copy_snippet(0)])
        .unwrap();
    let renderer = Renderer::new(builder.build());

    let out = renderer.render_to_vec(ComponentId(0), &[] as &[&str]).unwrap();
    assert_eq!(out, b"ok");
}

/// Sets the interrupt flag after the first write, like a client disconnecting
struct DisconnectingSink {
    written: Vec<u8>,
    flag: Arc<AtomicBool>,
}

impl Write for DisconnectingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        self.flag.store(true, Ordering::Relaxed);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn cancellation_leaves_partial_output() {
    let renderer = Renderer::new(bold_template());
    let flag = Arc::new(AtomicBool::new(false));
    let mut sink = DisconnectingSink {
        written: Vec::new(),
        flag: flag.clone(),
    };

    let result = renderer.render_interruptible(ComponentId(0), &["hi"], &mut sink, flag);
    assert!(matches!(result, Err(RenderError::Interrupted)));
    assert_eq!(sink.written, b"<b>");
}

/// Accepts `limit` bytes, then fails like a closed socket
struct ClosedSink {
    written: Vec<u8>,
    limit: usize,
}

impl Write for ClosedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() + buf.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_failure_is_reported() {
    let renderer = Renderer::new(bold_template());
    let mut sink = ClosedSink {
        written: Vec::new(),
        limit: 5,
    };

    let result = renderer.render(ComponentId(0), &["hi"], &mut sink);
    match result {
        Err(e) => assert!(e.is_sink_error()),
        Ok(()) => panic!("expected sink error"),
    }
    assert_eq!(sink.written, b"<b>hi");
}

#[test]
fn concurrent_renders_are_isolated() {
    const THREADS: u32 = 8;
    const ROUNDS: usize = 200;

    // Component i writes its own marker, then a shared leaf that copies data[0]
    let mut builder = Template::builder();
    for i in 0..THREADS {
        builder.add_snippet(format!("[{i}:")).unwrap();
    }
    let close = builder.add_snippet("]").unwrap();
    for i in 0..THREADS {
        builder
            .add_component([
                Instruction::copy_snippet(i),
                Instruction::push_component(THREADS),
                Instruction::push_component(THREADS),
                Instruction::ExecComponent,
                Instruction::CopySnippet { snippet: close },
                Instruction::ExecComponent,
                Instruction::copy_data(1),
            ])
            .unwrap();
    }
    builder.add_component([Instruction::copy_data(0)]).unwrap();
    let renderer = Renderer::new(builder.build());

    std::thread::scope(|scope| {
        for i in 0..THREADS {
            let renderer = renderer.clone();
            scope.spawn(move || {
                let data = [format!("data{i}"), format!("/{i}")];
                let expected = format!("[{i}:data{i}]data{i}/{i}");
                for _ in 0..ROUNDS {
                    let out = renderer.render_to_vec(ComponentId(i), &data).unwrap();
                    assert_eq!(String::from_utf8(out).unwrap(), expected);
                }
            });
        }
    });
}
