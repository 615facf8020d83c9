//! Translation batch: swap text layer contents per language and export.
//!
//! The document's original texts are put back once the run ends, whether
//! it completed, failed or was cancelled.

use super::{
    file_stem, require_kind, run_batch, BatchReport, ExportSink, Pipeline, PipelineError,
    TranslationRow, TranslationTable,
};
use crate::assets::AssetSource;
use crate::document::{Document, LayerKind, LayerPath};
use std::path::Path;

impl<A: AssetSource, S: ExportSink> Pipeline<'_, A, S> {
    /// Export one copy of `document` per language row, named
    /// `<document>_<language>.<ext>`.
    ///
    /// Every header layer must exist and be a text layer, and a text
    /// renderer must be set, before any row runs.
    #[tracing::instrument(skip_all, fields(document = %document.name, languages = table.rows.len()))]
    pub fn translate(
        &mut self,
        document: &mut Document,
        table: &TranslationTable,
        output_dir: &Path,
    ) -> Result<BatchReport, PipelineError> {
        let targets = table
            .layer_names
            .iter()
            .map(|name| require_kind(document, name, LayerKind::Text))
            .collect::<Result<Vec<_>, _>>()?;
        if let (None, Some(layer)) = (self.text, table.layer_names.first()) {
            return Err(PipelineError::MissingFont {
                layer: layer.clone(),
            });
        }

        let originals: Vec<(LayerPath, String)> = targets
            .iter()
            .filter_map(|path| {
                let contents = document.node(path)?.text_contents()?.to_string();
                Some((path.clone(), contents))
            })
            .collect();

        let options = self.config.translate_export.clone();
        let stem = if document.name.is_empty() {
            "document".to_string()
        } else {
            file_stem(Path::new(&document.name))
        };
        let mut report = BatchReport::default();

        let result = run_batch(&table.rows, self.cancel, |_, row: &TranslationRow| {
            for (path, text) in targets.iter().zip(&row.texts) {
                if let Some(layer) = document.node_mut(path) {
                    layer.set_text_contents(text.as_str());
                }
            }

            let rendered = document.render(self.text);
            let language = output_name_part(&row.language)?;
            let output = output_dir.join(format!(
                "{stem}_{language}.{}",
                options.format.extension()
            ));
            self.export(&rendered, output, &options, &mut report)
        });

        for (path, contents) in originals {
            if let Some(layer) = document.node_mut(&path) {
                layer.set_text_contents(contents);
            }
        }
        tracing::debug!(layers = targets.len(), "restored original texts");

        result?;
        Ok(report)
    }
}

/// The language cell as a file name fragment.
///
/// Path separators would place the export outside the output folder.
fn output_name_part(language: &str) -> Result<&str, PipelineError> {
    let trimmed = language.trim();
    if trimmed.is_empty() || trimmed.contains(['/', '\\', '\0']) {
        return Err(PipelineError::InvalidLanguage {
            row: None,
            language: language.to_string(),
        });
    }
    Ok(trimmed)
}
