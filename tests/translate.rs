use std::{fs, path::PathBuf};

use jpyer::{Indent, Jpyer, JpyerError, Options, analyzer::AnalyzerOptions};

fn fixture(name: &str) -> PathBuf { PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name) }

fn translate(source: &str) -> String { Jpyer::default().translate(source, Indent::default()).unwrap().0 }

#[test]
fn inventory() {
	let (text, unit) = Jpyer::default().translate_file(fixture("inventory.java"), Indent::default()).unwrap();
	assert_eq!(unit.classes.iter().map(|class| class.name.as_str()).collect::<Vec<_>>(), ["Item", "Inventory"]);

	let expected = [
		"import sys\n",
		"class Item:\n",
		"    def __init__(self, name: str, quantity: int = 0):\n",
		"        self.price: float = 1.5\n",
		"        self.name = name\n",
		"    def total(self) -> float:\n        return self.price * self.quantity\n",
		"class Inventory:\n    MAX_ITEMS: int = 100\n",
		"        self.items: list[Item] = list()\n",
		"        if len(self.items) >= Inventory.MAX_ITEMS:\n            raise RuntimeError(\"full\")\n",
		"        for item in self.items:\n            sum += item.total()\n",
		"    @staticmethod\n    def grade(tier: int) -> str:\n",
		"        match tier:\n            case 10 | 9:\n                result = \"A\"\n",
		"            case _:\n                result = \"C\"\n",
		"        for i in range(1, (3) + 1):\n            inventory.add(Item(\"item\" + str(i), i * 2))\n",
		"        while True:\n            countdown -= 1\n            if not (countdown > 0):\n                break\n",
		"        print(\"value: \" + str(inventory.value()))\n",
		"        print(Inventory.grade(9))\n",
		"if __name__ == \"__main__\":\n    Inventory.main(sys.argv[1:])\n",
	];
	for fragment in expected {
		assert!(text.contains(fragment), "missing {fragment:?} in\n{text}");
	}
	assert!(!text.contains("Unknown node"));
}

#[test]
fn inventory_reports_only_mixed_concatenation() {
	let jpyer = Jpyer::default();
	let (_, unit) = jpyer.translate_file(fixture("inventory.java"), Indent::default()).unwrap();
	let errors = jpyer.analyze(&unit);
	assert_eq!(errors.iter().map(|error| error.line()).collect::<Vec<_>>(), [Some(68), Some(74)], "{errors:?}");
	assert!(errors.iter().all(|error| error.message.starts_with("operand types of binary operator '+'")));
}

#[test]
fn translation_round_trips_through_files() {
	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join("Hello.java");
	let target = dir.path().join("hello.py");
	fs::write(&source, "public class Hello {\n\tpublic static void main(String[] args) {\n\t\tSystem.out.print(\"hi\");\n\t}\n}\n")
		.unwrap();

	let (text, _) = Jpyer::default().translate_file(&source, Indent::Tab).unwrap();
	fs::write(&target, &text).unwrap();

	let written = fs::read_to_string(&target).unwrap();
	assert!(written.contains("class Hello:\n\t@staticmethod\n\tdef main(args: list[str]) -> None:\n\t\tprint(\"hi\", end='')\n"));
	assert!(written.ends_with("if __name__ == \"__main__\":\n\tHello.main(sys.argv[1:])\n"));
}

#[test]
fn problems_are_reported_but_translation_goes_on() {
	let source = "class A {\n\tint f() {\n\t\tint x = true;\n\t\treturn y;\n\t}\n}";
	let jpyer = Jpyer::default();
	let (text, unit) = jpyer.translate(source, Indent::default()).unwrap();
	assert!(text.contains("x: int = True\n"));
	assert!(text.contains("return y\n"));

	let errors = jpyer.analyze(&unit);
	assert_eq!(errors.len(), 2, "{errors:?}");
	assert_eq!(errors[0].line(), Some(3));
	assert!(errors[1].message.contains("'y'"));
}

#[test]
fn field_limit_is_configurable() {
	let source = "class A { int a; int b; int c; }";
	let analyzer = AnalyzerOptions { global_var_limit: Some(2), block_depth_limit: None };
	let strict = Jpyer::new(Options { analyzer, ..Default::default() });
	let unit = strict.parse(source).unwrap();
	assert_eq!(strict.analyze(&unit).len(), 1);
	assert!(Jpyer::default().analyze(&unit).is_empty());
}

#[test]
fn syntax_errors_stop_translation() {
	let result = Jpyer::default().translate("class A { void f() { int = 3; } }", Indent::default());
	assert!(matches!(result, Err(JpyerError::SyntaxError(_))));
}

#[test]
fn constant_folding_reaches_the_output() {
	let text = translate("class A { void f() { int x = 2 * (3 + 4) - 0; boolean b = !(1 < 2); } }");
	assert!(text.contains("x: int = 14\n"));
	assert!(text.contains("b: bool = False\n"));
}

#[test]
fn counted_loop_that_writes_its_counter_stays_a_while() {
	let text = translate("class A { void f() { for (int i = 0; i < 10; i++) { i = i + 2; } } }");
	assert!(!text.contains("range("));
	assert!(text.contains("        i: int = 0\n        while i < 10:\n            i += 2\n            i += 1\n"));
}

#[test]
fn unsupported_statements_become_comments() {
	let source = "class A { void f(int x) { assert x > 0; synchronized (this) { x++; } System.out.println(x); } }";
	let (text, unit) = Jpyer::default().translate(source, Indent::default()).unwrap();
	assert!(text.contains("        # Unknown node: assert x > 0;\n        # Unknown node: synchronized (this) { x ++; }\n"));
	assert!(text.contains("        print(x)\n"));
	assert!(Jpyer::default().analyze(&unit).is_empty());
}

#[test]
fn try_catch_finally() {
	let text = translate(
		"class A { int f(int[] a) { try { return a[3]; } catch (ArrayIndexOutOfBoundsException e) { return -1; } finally { \
		 System.out.println(\"done\"); } } }",
	);
	assert!(text.contains(
		"        try:\n            return a[3]\n        except IndexError as e:\n            return -1\n        \
		 finally:\n            print(\"done\")\n"
	));
}
