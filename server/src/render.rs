//! Server-rendered page: the two task panels, input preview and players.
//!
//! Everything is rendered from the session plus the view each panel ended
//! in for this request. Audio is embedded as `data:` URIs.

use voice_core::{wav, InlineAudio, TargetLanguage, TtsLanguage};

use crate::panel::{PanelView, Tab};
use crate::session::SessionState;

pub const TTS_OUTPUT_ID: &str = "tts-output-player";
pub const S2S_OUTPUT_ID: &str = "s2s-output-player";
pub const S2S_PREVIEW_ID: &str = "s2s-preview-player";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 1200px; padding: 1rem 2rem; }
h5 { margin: 0.8rem 0 0.4rem; font-size: 1rem; }
.tabs > input[type=radio] { display: none; }
.tabs > label { display: inline-block; padding: 0.5rem 1rem; cursor: pointer; border-bottom: 2px solid transparent; }
.tabs > input[type=radio]:checked + label { border-bottom-color: #e10000; font-weight: 600; }
.panel { display: none; padding-top: 1rem; }
#tab-tts:checked ~ #panel-tts, #tab-s2s:checked ~ #panel-s2s { display: block; }
.columns { display: flex; gap: 2rem; align-items: flex-start; }
.columns > .wide { flex: 1.5; }
.columns > .narrow { flex: 1; }
.box { border: 1px solid #d0d0d0; border-radius: 8px; padding: 1rem; }
textarea, select { width: 100%; box-sizing: border-box; margin-bottom: 0.6rem; }
.buttons { display: flex; gap: 1rem; }
.buttons > button { flex: 1; padding: 0.5rem; }
.player { background-color: #111827; padding: 20px; border-radius: 10px; }
.message { padding: 0.75rem 1rem; border-radius: 6px; margin: 0.6rem 0; }
.message.warning { background: #fff8e1; color: #7a5a00; }
.message.error { background: #fdecea; color: #a8071a; }
.caption { color: #777; font-size: 0.85rem; }
#record-button { font-size: 2rem; background: none; border: none; cursor: pointer; color: #6aa36f; }
#record-button.recording { color: #e10000; }
"#;

// Captures mono f32 PCM at 16 kHz and posts it raw; stops itself after 180 s.
const RECORDER_SCRIPT: &str = r#"
(function () {
  const button = document.getElementById('record-button');
  if (!button) return;
  let ctx = null, stream = null, node = null, chunks = [], timer = null;

  async function stop() {
    clearTimeout(timer);
    node.disconnect();
    stream.getTracks().forEach(t => t.stop());
    const rate = ctx.sampleRate;
    await ctx.close();
    ctx = null;
    button.classList.remove('recording');
    const total = chunks.reduce((n, c) => n + c.length, 0);
    const pcm = new Float32Array(total);
    let offset = 0;
    for (const c of chunks) { pcm.set(c, offset); offset += c.length; }
    await fetch('/s2s/record?sample_rate=' + rate, {
      method: 'POST',
      headers: { 'content-type': 'application/octet-stream' },
      body: pcm.buffer,
    });
    window.location.href = '/?tab=s2s';
  }

  button.addEventListener('click', async function () {
    if (ctx) { await stop(); return; }
    stream = await navigator.mediaDevices.getUserMedia({ audio: true });
    ctx = new AudioContext({ sampleRate: 16000 });
    const source = ctx.createMediaStreamSource(stream);
    node = ctx.createScriptProcessor(4096, 1, 1);
    chunks = [];
    node.onaudioprocess = e => chunks.push(new Float32Array(e.inputBuffer.getChannelData(0)));
    source.connect(node);
    node.connect(ctx.destination);
    button.classList.add('recording');
    timer = setTimeout(stop, 180000);
  });
})();
"#;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn audio_player(id: &str, audio: &InlineAudio) -> String {
    format!(
        r#"<div class="player" id="{id}">
  <audio controls style="width:100%;">
    <source src="{}" type="audio/wav">
    Your browser does not support the audio element.
  </audio>
</div>
"#,
        audio.data_uri()
    )
}

fn message(kind: &str, text: &str) -> String {
    format!(r#"<div class="message {kind}">{}</div>"#, escape_html(text))
}

fn options<T: Copy + PartialEq>(
    all: &[T],
    selected: T,
    code: impl Fn(T) -> &'static str,
    label: impl Fn(T) -> &'static str,
) -> String {
    all.iter()
        .map(|&item| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                code(item),
                if item == selected { " selected" } else { "" },
                escape_html(label(item))
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

fn tts_panel(session: &SessionState, view: &PanelView) -> String {
    let mut out = String::new();
    out.push_str(r#"<section class="panel" id="panel-tts"><h3>📝 -&gt; 🗣️ Text to Speech</h3><div class="columns"><div class="wide">"#);
    out.push_str(&format!(
        r#"<form method="post" action="/tts" enctype="multipart/form-data">
<textarea name="text" rows="3" aria-label="Enter text">{}</textarea>
<label>Or upload a .txt file <input type="file" name="file" accept=".txt"></label>
<select name="lang" aria-label="TTS language">{}</select>
<div class="buttons">
  <button type="submit" name="action" value="submit">🎤 Generate Speech</button>
  <button type="submit" name="action" value="clear">🧹 Clear</button>
</div>
</form>
"#,
        escape_html(session.tts_text()),
        options(&TtsLanguage::ALL, session.tts_language, TtsLanguage::code, TtsLanguage::label),
    ));
    if let PanelView::Warning(text) = view {
        out.push_str(&message("warning", text));
    }
    out.push_str(r#"</div><div class="narrow">"#);
    match view {
        PanelView::Rendered(audio) => {
            out.push_str("<p><strong>🔊 TTS Output will appear here</strong></p>");
            out.push_str(&audio_player(TTS_OUTPUT_ID, audio));
        }
        PanelView::ErrorShown(text) => {
            out.push_str("<p><strong>🔊 TTS Output will appear here</strong></p>");
            out.push_str(&message("error", text));
        }
        PanelView::Idle | PanelView::Warning(_) => {}
    }
    out.push_str("</div></div></section>\n");
    out
}

fn s2s_panel(session: &SessionState, view: &PanelView) -> String {
    let mut out = String::new();
    out.push_str(r#"<section class="panel" id="panel-s2s"><h3>🎤 -&gt; 🎙️ Speech to Speech</h3><div class="columns"><div class="wide">"#);

    // Input column: upload, record, preview
    out.push_str(
        r#"<h5>🎧 Audio Input</h5><div class="box">
<div class="columns"><div class="wide">
<form method="post" action="/s2s/audio" enctype="multipart/form-data">
  <input type="file" name="audio" accept=".wav,.mp3,.m4a,.opus" aria-label="Drop or upload audio" onchange="this.form.submit()">
  <noscript><button type="submit">Upload</button></noscript>
</form>
</div><div class="narrow"><button type="button" id="record-button" title="Record (3 min max)">🎙️</button></div></div>
"#,
    );
    if let Some(input) = &session.input_audio {
        out.push_str(&format!("<p>{}</p>", escape_html(input.source.preview_label())));
        out.push_str(&audio_player(S2S_PREVIEW_ID, &input.to_inline()));
        if let Some(info) = wav::probe(&input.bytes) {
            out.push_str(&format!(
                r#"<p class="caption">{:.1} s · {} Hz · {} ch</p>"#,
                info.duration_ms as f64 / 1000.0,
                info.sample_rate,
                info.channels
            ));
        }
    }
    out.push_str("</div></div>");

    // Output column: language form, then the result
    out.push_str(&format!(
        r#"<div class="narrow">
<form method="post" action="/s2s">
<h5 title="Choose the target language and trigger translation.">🌍 Languages</h5>
<select name="lang" aria-label="Target language">{}</select>
<div class="buttons">
  <button type="submit" name="action" value="submit">🔁 Translate &amp; Clone</button>
  <button type="submit" name="action" value="clear">🧹 Clear</button>
</div>
</form>
<h5>🎧 Output Audio</h5>
"#,
        options(&TargetLanguage::ALL, session.s2s_language, TargetLanguage::code, TargetLanguage::label),
    ));
    match view {
        PanelView::Warning(text) => out.push_str(&message("warning", text)),
        PanelView::ErrorShown(text) => out.push_str(&message("error", text)),
        PanelView::Rendered(audio) => out.push_str(&audio_player(S2S_OUTPUT_ID, audio)),
        PanelView::Idle => {
            if let Some(audio) = &session.output_audio {
                out.push_str(&audio_player(S2S_OUTPUT_ID, audio));
            }
        }
    }
    out.push_str("</div></div></section>\n");
    out
}

/// Render the full page for one session.
pub fn page(session: &SessionState, tts: &PanelView, s2s: &PanelView, tab: Tab) -> String {
    let (tts_checked, s2s_checked) = match tab {
        Tab::TextToSpeech => (" checked", ""),
        Tab::SpeechToSpeech => ("", " checked"),
    };

    let mut out = String::with_capacity(8 * 1024);
    out.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>TTS + S2ST</title>
<style>{STYLE}</style>
</head>
<body>
<h5><strong>🗣️ UNLOCK AFRICAN VOICES</strong></h5>
<p>This app demonstrates both <strong>Text-to-Speech</strong> (TTS) and <strong>Speech-to-Speech</strong> (S2ST).<br>
AFRICAN VOICES demo: type text or upload audio, choose the language, and get speech output!</p>
<div class="tabs">
<input type="radio" name="tab" id="tab-tts"{tts_checked}><label for="tab-tts">📝 Text to Speech</label>
<input type="radio" name="tab" id="tab-s2s"{s2s_checked}><label for="tab-s2s">🎤 Speech to Speech</label>
"#
    ));
    out.push_str(&tts_panel(session, tts));
    out.push_str(&s2s_panel(session, s2s));
    out.push_str("</div>\n<script>");
    out.push_str(RECORDER_SCRIPT);
    out.push_str("</script>\n</body>\n</html>\n");
    out
}
