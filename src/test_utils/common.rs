use crate::core::platform::container::cas::{Cas, View, INITIAL_VIEW};
use crate::core::platform::container::feature_structure::FeatureStructure;
use crate::core::platform::container::prediction::TOKEN_TYPE;
use crate::core::platform::container::type_system::{
    FeatureDescription, TypeDescription, TypeSystem, TYPE_NAME_ANNOTATION, TYPE_NAME_SOFA,
    TYPE_NAME_STRING,
};

pub const NAMED_ENTITY_TYPE: &str = "webanno.custom.NamedEntity";

pub const TYPE_SYSTEM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<typeSystemDescription xmlns="http://uima.apache.org/resourceSpecifier">
  <types>
    <typeDescription>
      <name>de.tudarmstadt.ukp.dkpro.core.api.segmentation.type.Token</name>
      <description/>
      <supertypeName>uima.tcas.Annotation</supertypeName>
    </typeDescription>
    <typeDescription>
      <name>webanno.custom.NamedEntity</name>
      <description>Entity &amp; label</description>
      <supertypeName>uima.tcas.Annotation</supertypeName>
      <features>
        <featureDescription>
          <name>value</name>
          <rangeTypeName>uima.cas.String</rangeTypeName>
        </featureDescription>
      </features>
    </typeDescription>
  </types>
</typeSystemDescription>
"#;

pub const TOKENIZED_XMI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmlns:xmi="http://www.omg.org/XMI" xmlns:cas="http:///uima/cas.ecore" xmlns:type="http:///de/tudarmstadt/ukp/dkpro/core/api/segmentation/type.ecore" xmlns:tcas="http:///uima/tcas.ecore" xmi:version="2.0">
  <cas:NULL xmi:id="0"/>
  <tcas:DocumentAnnotation xmi:id="8" sofa="1" begin="0" end="26" language="en"/>
  <type:Token xmi:id="2" sofa="1" begin="0" end="6"/>
  <type:Token xmi:id="3" sofa="1" begin="7" end="12"/>
  <type:Token xmi:id="4" sofa="1" begin="13" end="16"/>
  <type:Token xmi:id="5" sofa="1" begin="17" end="26"/>
  <cas:Sofa xmi:id="1" sofaNum="1" sofaID="_InitialView" mimeType="text" sofaString="Barack Obama was president"/>
  <cas:View sofa="1" members="8 2 3 4 5"/>
</xmi:XMI>
"#;

pub fn type_system_with_tokens() -> TypeSystem {
    let mut ts = TypeSystem::with_builtins();
    ts.add_type(TypeDescription::new(TOKEN_TYPE, TYPE_NAME_ANNOTATION))
        .expect("token type");
    ts.add_type(
        TypeDescription::new(NAMED_ENTITY_TYPE, TYPE_NAME_ANNOTATION)
            .with_feature(FeatureDescription::new("value", TYPE_NAME_STRING)),
    )
    .expect("named entity type");
    ts
}

/// Builds a CAS over `text` with one Token per (begin, end) pair.
pub fn cas_with_tokens(text: &str, spans: &[(usize, usize)]) -> Cas {
    let sofa = FeatureStructure::new(1, TYPE_NAME_SOFA)
        .with_feature("sofaNum", "1")
        .with_feature("sofaID", INITIAL_VIEW)
        .with_feature("mimeType", "text")
        .with_feature("sofaString", text);

    let mut structures = vec![sofa];
    let mut members = Vec::new();
    for (i, (begin, end)) in spans.iter().enumerate() {
        let id = i as u64 + 2;
        structures.push(
            FeatureStructure::new(id, TOKEN_TYPE)
                .with_feature("sofa", "1")
                .with_feature("begin", begin.to_string())
                .with_feature("end", end.to_string()),
        );
        members.push(id);
    }

    Cas::new(Vec::new(), structures, vec![View { sofa: 1, members }])
}
