// tests/integration/common.rs - Fixtures shared by the integration tests

use actix_web::web;
use std::sync::Arc;
use xmi_annotator::application::ports::output::document_store_port::DocumentStorePort;
use xmi_annotator::infrastructure::adapters::input::lexicon_nlp_adapter::LexiconNlpAdapter;
use xmi_annotator::infrastructure::adapters::output::xmi::XmiDocumentStore;
use xmi_annotator::setup::http_server::AppState;
use xmi_annotator::setup::use_case_initializer::initialize_use_cases;
use xmi_annotator::{ApiVariant, Settings};

pub const NAMED_ENTITY_TYPE: &str = "webanno.custom.NamedEntity";
pub const POS_TYPE: &str = "webanno.custom.Pos";

pub const TYPE_SYSTEM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<typeSystemDescription xmlns="http://uima.apache.org/resourceSpecifier">
  <types>
    <typeDescription>
      <name>de.tudarmstadt.ukp.dkpro.core.api.segmentation.type.Token</name>
      <supertypeName>uima.tcas.Annotation</supertypeName>
    </typeDescription>
    <typeDescription>
      <name>webanno.custom.NamedEntity</name>
      <supertypeName>uima.tcas.Annotation</supertypeName>
      <features>
        <featureDescription>
          <name>value</name>
          <rangeTypeName>uima.cas.String</rangeTypeName>
        </featureDescription>
      </features>
    </typeDescription>
    <typeDescription>
      <name>webanno.custom.Pos</name>
      <supertypeName>uima.tcas.Annotation</supertypeName>
      <features>
        <featureDescription>
          <name>PosValue</name>
          <rangeTypeName>uima.cas.String</rangeTypeName>
        </featureDescription>
      </features>
    </typeDescription>
  </types>
</typeSystemDescription>"#;

/// Builds an XMI document whose initial view holds `text` and one Token per character span.
pub fn tokenized_xmi(text: &str, spans: &[(usize, usize)]) -> String {
    let mut tokens = String::new();
    let mut members = Vec::new();
    for (i, (begin, end)) in spans.iter().enumerate() {
        let id = i + 2;
        tokens.push_str(&format!(
            "  <type:Token xmi:id=\"{}\" sofa=\"1\" begin=\"{}\" end=\"{}\"/>\n",
            id, begin, end
        ));
        members.push(id.to_string());
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmlns:xmi="http://www.omg.org/XMI" xmlns:cas="http:///uima/cas.ecore" xmlns:type="http:///de/tudarmstadt/ukp/dkpro/core/api/segmentation/type.ecore" xmi:version="2.0">
  <cas:NULL xmi:id="0"/>
  <cas:Sofa xmi:id="1" sofaNum="1" sofaID="_InitialView" mimeType="text" sofaString="{}"/>
{}  <cas:View sofa="1" members="{}"/>
</xmi:XMI>"#,
        text,
        tokens,
        members.join(" ")
    )
}

pub fn state(variant: ApiVariant) -> web::Data<AppState> {
    let mut settings = Settings::default();
    settings.api.variant = variant;
    state_with(settings)
}

pub fn state_with(settings: Settings) -> web::Data<AppState> {
    let nlp = Arc::new(LexiconNlpAdapter::bundled().unwrap());
    web::Data::new(AppState {
        settings: Arc::new(settings),
        use_cases: initialize_use_cases(nlp),
    })
}

/// Spans and labels of every `layer` annotation in `xmi`, in document order.
pub fn labels(xmi: &str, layer: &str, feature: &str) -> Vec<((usize, usize), String)> {
    let store = XmiDocumentStore::new();
    let ts = store.parse_type_system(TYPE_SYSTEM).unwrap();
    let cas = store.parse_cas(xmi, &ts).unwrap();
    cas.select(&ts, layer)
        .unwrap()
        .iter()
        .map(|fs| (fs.span().unwrap(), fs.feature(feature).unwrap().to_string()))
        .collect()
}
