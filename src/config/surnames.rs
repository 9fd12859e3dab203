//! Built-in name and institution dictionaries.

/// Common single-character Chinese surnames
pub const SINGLE_SURNAMES: &str = "王李张刘陈杨黄赵吴周徐孙马朱胡郭何高林罗郑梁谢宋唐許许韩冯邓曹彭曾肖田董袁潘于蒋蔡余杜叶程苏魏吕丁任沈姚卢姜崔钟谭陆汪范金石廖贾夏韦付方白邹孟熊秦邱江尹薛闫段雷侯龙史陶黎贺顾毛郝龚邵万钱严覃武戴莫孔向汤常温康施文牛樊葛邢安齐易乔伍庞颜倪庄聂章鲁岳翟殷詹申欧耿关兰焦俞左柳甘祝包宁尚符舒阮柯纪梅童凌毕单季裴霍涂成苗谷盛曲翁冉骆蓝路游辛靳管柴蒙鲍华喻祁蒲房滕屈饶解牟艾尤阳时穆农司卓古吉缪简车项连芦麦褚娄窦戚岑景党宫费卜冷晏席卫米柏宗瞿桂全佟应臧闵苟邬边卞姬师和仇栾隋商刁沙荣巫寇桑郎甄丛仲虞敖巩明佘池查麻苑迟邝官封谈匡鞠惠荆乐冀郁胥南班储原栗燕楚鄢劳谌奚皮粟冼蔺楼盘满闻位厉伊仝区郜海阚花权强帅屠豆朴盖练廉禹井祖漆巴丰支卿国狄平计索宣晋相初门云容敬来扈晁芮都普阙浦戈伏鹿薄邸雍辜羊阿乌母裘亓修邰赫杭况那宿鲜印逯隆茹诸战慕危玉银亢嵇公哈湛宾戎勾茅利於呼居揭干但尉冶斯元束檀衣信展阎昝";

/// Common compound Chinese surnames
pub const COMPOUND_SURNAMES: &[&str] = &[
    "欧阳", "司马", "上官", "诸葛", "东方", "皇甫", "尉迟", "公孙", "慕容", "长孙", "宇文",
    "司徒", "夏侯", "轩辕", "令狐", "端木", "独孤", "南宫", "西门", "百里", "呼延", "万俟",
    "赫连", "澹台", "公冶", "宗政", "濮阳", "太史", "申屠", "钟离", "闾丘", "东郭", "左丘",
];

/// Latin keywords marking an organizational author (matched as whole words)
pub const INSTITUTION_KEYWORDS: &[&str] = &[
    "University", "Universität", "Université", "Universidad", "Institute", "Institut",
    "College", "School", "Academy", "Inc", "Ltd", "LLC", "GmbH", "Corp", "Corporation",
    "Company", "Co", "Organization", "Organisation", "Association", "Society", "Committee",
    "Council", "Commission", "Agency", "Foundation", "Laboratory", "Laboratories", "Lab",
    "Department", "Ministry", "Bureau", "Office", "Group", "Center", "Centre", "Consortium",
    "Federation", "Alliance", "Network", "Board", "Service", "Hospital", "Team", "Project",
    "Press", "Museum", "Library",
];

/// Han markers that identify an organization anywhere in the name
pub const HAN_INSTITUTION_MARKERS: &[&str] = &[
    "大学", "学院", "学校", "研究院", "研究所", "研究中心", "实验室", "公司", "集团", "委员会",
    "协会", "学会", "中心", "出版社", "医院", "银行", "政府", "办公室", "办公厅", "管理局",
    "总局", "基金会", "联合会", "工作组", "编辑部", "标准化", "组织", "机构", "新闻", "日报",
    "中华人民共和国", "国务院",
];

/// Han characters that identify an organization when they end a name of
/// three or more characters
pub const HAN_INSTITUTION_SUFFIXES: &[&str] = &[
    "网", "局", "部", "社", "报", "院", "所", "厅", "馆", "署", "系", "室", "处", "台",
];

/// Keywords marking the source clause of an APA entry as a book publisher
pub const PUBLISHER_KEYWORDS: &[&str] = &[
    "Press", "Publisher", "Publishers", "Publishing", "Books", "Verlag", "Éditions",
    "Wiley", "Springer", "Elsevier", "Routledge", "Pearson", "McGraw-Hill", "O'Reilly",
    "Addison-Wesley", "Prentice Hall", "Cambridge", "Oxford", "MIT", "Sage", "出版社",
    "书局", "出版集团",
];
